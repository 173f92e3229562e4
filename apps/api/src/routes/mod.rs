pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::editor::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document editing
        .route(
            "/api/v1/document",
            get(handlers::handle_get_document).put(handlers::handle_put_document),
        )
        .route("/api/v1/document/edit", post(handlers::handle_edit))
        // Template & preview
        .route(
            "/api/v1/template",
            get(handlers::handle_get_template).put(handlers::handle_put_template),
        )
        .route("/api/v1/preview", get(handlers::handle_preview))
        .route("/api/v1/preview/tree", get(handlers::handle_preview_tree))
        // Actions
        .route("/api/v1/actions", get(handlers::handle_action_states))
        .route("/api/v1/actions/summarize", post(handlers::handle_summarize))
        .route("/api/v1/actions/save", post(handlers::handle_save))
        .route("/api/v1/actions/export", post(handlers::handle_export))
        // Notifications
        .route(
            "/api/v1/notifications",
            get(handlers::handle_get_notifications).delete(handlers::handle_drain_notifications),
        )
        .with_state(state)
}
