//! Session middleware configuration for the manager.
//!
//! Sessions only hold presentation state (the open modal and one-shot
//! notices), so they live in an in-process moka cache and are lost on
//! restart. Entries are evicted once their expiry passes or the store is
//! full, whichever comes first.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::ManagerConfig;

/// Session cookie name for the manager.
pub const SESSION_COOKIE_NAME: &str = "phone_manager_session";

/// Session expiry time in seconds (2 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 2 * 60 * 60;

/// Most sessions held at once; the least recently used are evicted first.
pub const MAX_SESSIONS: u64 = 10_000;

/// Bounded in-memory session store.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &ManagerConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
