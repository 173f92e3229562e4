//! Axum route handlers for the editor session.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::editor::{ActionKind, ActionState, Notification};
use crate::errors::AppError;
use crate::models::resume::{DocumentEdit, ResumeDocument};
use crate::render::node::Node;
use crate::render::{render_page_html, render_preview, TemplateId};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: TemplateId,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Overrides the session's selected template for this render only.
    pub template: Option<String>,
}

impl PreviewQuery {
    fn resolve(&self, state: &AppState) -> TemplateId {
        self.template
            .as_deref()
            .map(TemplateId::from_tag)
            .unwrap_or_else(|| state.session.template())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.document())
}

/// PUT /api/v1/document
///
/// Replaces the whole document. Education and experience must keep at least
/// one (possibly blank) entry.
pub async fn handle_put_document(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<ResumeDocument>, AppError> {
    if document.education.is_empty() || document.experience.is_empty() {
        return Err(AppError::Validation(
            "education and experience must each contain at least one entry".to_string(),
        ));
    }
    Ok(Json(state.session.replace_document(document)))
}

/// POST /api/v1/document/edit
pub async fn handle_edit(
    State(state): State<AppState>,
    Json(edit): Json<DocumentEdit>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.session.edit(&edit)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Template & preview
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/template
pub async fn handle_get_template(State(state): State<AppState>) -> Json<TemplateResponse> {
    Json(TemplateResponse {
        template: state.session.template(),
    })
}

/// PUT /api/v1/template
///
/// Unknown tags select the modern layout.
pub async fn handle_put_template(
    State(state): State<AppState>,
    Json(request): Json<TemplateRequest>,
) -> Json<TemplateResponse> {
    let template = TemplateId::from_tag(&request.template);
    state.session.select_template(template);
    Json(TemplateResponse { template })
}

/// GET /api/v1/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Html<String> {
    let template = query.resolve(&state);
    Html(render_page_html(&state.session.document(), template))
}

/// GET /api/v1/preview/tree
pub async fn handle_preview_tree(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Json<Node> {
    let template = query.resolve(&state);
    Json(render_preview(&state.session.document(), template))
}

// ────────────────────────────────────────────────────────────────────────────
// Actions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/actions/summarize
pub async fn handle_summarize(State(state): State<AppState>) -> Json<Notification> {
    Json(state.session.summarize().await)
}

/// POST /api/v1/actions/save
pub async fn handle_save(State(state): State<AppState>) -> Json<Notification> {
    Json(state.session.save().await)
}

/// POST /api/v1/actions/export
///
/// Returns the PDF as an attachment, or the failure notification with 422.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let outcome = state.session.export().await;

    let Some(pdf) = outcome.pdf else {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(outcome.notification)).into_response());
    };

    let disposition = HeaderValue::from_str(&content_disposition(&pdf.file_name))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf.bytes,
    )
        .into_response())
}

/// GET /api/v1/actions
pub async fn handle_action_states(
    State(state): State<AppState>,
) -> Json<HashMap<ActionKind, ActionState>> {
    Json(state.session.action_states())
}

// ────────────────────────────────────────────────────────────────────────────
// Notifications
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/notifications
pub async fn handle_get_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.session.notifications())
}

/// DELETE /api/v1/notifications
///
/// Returns the drained notifications.
pub async fn handle_drain_notifications(
    State(state): State<AppState>,
) -> Json<Vec<Notification>> {
    Json(state.session.drain_notifications())
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987
/// UTF-8 name for everything else.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();

    let mut encoded = String::new();
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b".-_~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}
