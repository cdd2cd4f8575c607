//! Presentation models for the manager.
//!
//! - [`editor`] - Edit-modal state machine and image staging
//! - [`session`] - Session keys and session-backed helpers

pub mod editor;
pub mod session;

pub use editor::{
    DraftFields, Editor, EditorMode, EditorState, ImageStaging, PhoneDraft, Submission,
};
