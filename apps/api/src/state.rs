use crate::editor::EditorSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single editing session served by this process.
    pub session: EditorSession,
}
