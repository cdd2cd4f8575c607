//! Session-stored presentation state.
//!
//! Each browser gets its own modal state and a one-shot notice slot used to
//! report failures across redirects.

use tower_sessions::Session;

use super::editor::EditorState;

/// Session keys for manager state.
pub mod keys {
    /// Key for the edit-modal state.
    pub const EDITOR: &str = "editor";

    /// Key for a one-shot notice shown on the next list render.
    pub const NOTICE: &str = "notice";
}

/// Load the modal state (closed when nothing is stored).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_editor(session: &Session) -> Result<EditorState, tower_sessions::session::Error> {
    Ok(session
        .get::<EditorState>(keys::EDITOR)
        .await?
        .unwrap_or_default())
}

/// Persist the modal state. A closed modal removes the entry.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn store_editor(
    session: &Session,
    state: &EditorState,
) -> Result<(), tower_sessions::session::Error> {
    if state.is_open() {
        session.insert(keys::EDITOR, state).await
    } else {
        session.remove::<EditorState>(keys::EDITOR).await.map(|_| ())
    }
}

/// Queue a notice for the next list render.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_notice(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::NOTICE, message.into()).await
}

/// Take (and clear) the pending notice.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn take_notice(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(keys::NOTICE).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::middleware::session::session_store;

    fn session() -> Session {
        Session::new(None, Arc::new(session_store()), None)
    }

    #[tokio::test]
    async fn test_missing_editor_is_closed() {
        let session = session();
        assert_eq!(load_editor(&session).await.unwrap(), EditorState::Closed);
    }

    #[tokio::test]
    async fn test_store_and_close_editor() {
        let session = session();
        store_editor(&session, &EditorState::open_create())
            .await
            .unwrap();
        assert!(load_editor(&session).await.unwrap().is_open());

        store_editor(&session, &EditorState::Closed).await.unwrap();
        assert_eq!(load_editor(&session).await.unwrap(), EditorState::Closed);
    }

    #[tokio::test]
    async fn test_notice_is_one_shot() {
        let session = session();
        set_notice(&session, "Failed to delete phone").await.unwrap();
        assert_eq!(
            take_notice(&session).await.unwrap().as_deref(),
            Some("Failed to delete phone")
        );
        assert_eq!(take_notice(&session).await.unwrap(), None);
    }
}
