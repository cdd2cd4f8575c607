//! HTTP middleware stack for the manager.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing with status and latency)
//! 3. Session layer (tower-sessions with a bounded moka store)

pub mod session;

pub use session::create_session_layer;
