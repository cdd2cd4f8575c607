//! Phone Catalog Core - Shared types library.
//!
//! This crate provides the domain types used across the phone catalog:
//! - `manager` - Server-rendered catalog management UI
//! - `cli` - Command-line client for the catalog REST API
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Phone listings, their identifiers and text-backed prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
