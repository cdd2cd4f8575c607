//! HTTP route handlers for the manager.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (backend reachable)
//!
//! # Phones
//! GET  /                       - Phone list (with the edit modal when open)
//! POST /phones/new             - Open the modal for a new phone
//! POST /phones/{id}/edit       - Open the modal prefilled with a phone
//! POST /phones/{id}/delete     - Delete a phone
//!
//! # Edit modal
//! POST /editor                 - Stage/unstage images, save, or cancel
//! ```

pub mod editor;
pub mod health;
pub mod phones;

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the manager's routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Phones
        .route("/", get(phones::index))
        .route("/phones/new", post(phones::new_phone))
        .route("/phones/{id}/edit", post(phones::edit))
        .route("/phones/{id}/delete", post(phones::delete))
        // Edit modal
        .route("/editor", post(editor::update))
}

/// Render a template, falling back to a plain error page.
pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}
