//! Core types for the phone catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod id;
pub mod phone;
pub mod price;

pub use id::PhoneId;
pub use phone::{COLOUR_OPTIONS, MEMORY_OPTIONS, NewPhone, Phone, PhoneError};
pub use price::{Price, PriceError};
