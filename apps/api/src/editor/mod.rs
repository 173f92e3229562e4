// Editor shell: owns the session's single document and runs the three
// outward actions (summarize, save, export). Action failures never escape;
// they become notifications.

pub mod export;
pub mod handlers;
pub mod save;
pub mod summarize;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::models::resume::{DocumentEdit, DocumentError, ResumeDocument};
use crate::render::{render_preview, TemplateId};
use export::{ExportError, ExportedPdf, PdfExporter};
use save::ResumeStore;
use summarize::{build_description, SummaryClient, FALLBACK_SUMMARY};

// ────────────────────────────────────────────────────────────────────────────
// Notifications
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message produced by an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

pub const MSG_SUMMARY_OK: &str = "AI Summary Generated";
pub const MSG_SUMMARY_FALLBACK: &str = "AI summary generation failed. Using fallback.";
pub const MSG_SAVE_OK: &str = "Resume saved successfully!";
pub const MSG_SAVE_FAILED: &str = "Failed to save resume. Please try again.";
pub const MSG_EXPORT_STARTED: &str = "Generating PDF...";
pub const MSG_PREVIEW_NOT_FOUND: &str = "Resume preview not found.";
pub const MSG_EXPORT_FAILED: &str = "Failed to generate PDF.";

// ────────────────────────────────────────────────────────────────────────────
// Per-action in-flight state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Summarize,
    Save,
    Export,
}

impl ActionKind {
    fn label(&self) -> &'static str {
        match self {
            ActionKind::Summarize => "Summary generation",
            ActionKind::Save => "Save",
            ActionKind::Export => "PDF export",
        }
    }
}

/// idle → pending → idle | failed. A pending action refuses re-dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Failed,
}

type ActionTable = Mutex<HashMap<ActionKind, ActionState>>;

/// Marks an action pending for its lifetime. Dropped without `finish` (e.g.
/// the request future was cancelled) it records `Failed`.
struct InFlight<'a> {
    table: &'a ActionTable,
    kind: ActionKind,
    outcome: ActionState,
}

impl<'a> InFlight<'a> {
    fn begin(table: &'a ActionTable, kind: ActionKind) -> Option<Self> {
        let mut states = table.lock().unwrap_or_else(PoisonError::into_inner);
        let state = states.entry(kind).or_default();
        if *state == ActionState::Pending {
            return None;
        }
        *state = ActionState::Pending;
        Some(Self {
            table,
            kind,
            outcome: ActionState::Failed,
        })
    }

    fn finish(mut self, succeeded: bool) {
        self.outcome = if succeeded {
            ActionState::Idle
        } else {
            ActionState::Failed
        };
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut states = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        states.insert(self.kind, self.outcome);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// Result of the export action: the file on success, plus the final notification.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub pdf: Option<ExportedPdf>,
    pub notification: Notification,
}

struct SessionInner {
    document: RwLock<ResumeDocument>,
    template: RwLock<TemplateId>,
    notifications: Mutex<Vec<Notification>>,
    actions: ActionTable,
    summarizer: Arc<dyn SummaryClient>,
    store: Arc<dyn ResumeStore>,
    exporter: PdfExporter,
}

/// The editing session. Cheap to clone; all clones share one document.
#[derive(Clone)]
pub struct EditorSession {
    inner: Arc<SessionInner>,
}

impl EditorSession {
    pub fn new(
        summarizer: Arc<dyn SummaryClient>,
        store: Arc<dyn ResumeStore>,
        exporter: PdfExporter,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                document: RwLock::new(ResumeDocument::new()),
                template: RwLock::new(TemplateId::default()),
                notifications: Mutex::new(Vec::new()),
                actions: Mutex::new(HashMap::new()),
                summarizer,
                store,
                exporter,
            }),
        }
    }

    /// Snapshot of the current document.
    pub fn document(&self) -> ResumeDocument {
        self.inner
            .document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace_document(&self, document: ResumeDocument) -> ResumeDocument {
        let mut current = self
            .inner
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = document;
        current.clone()
    }

    /// Applies an edit and returns the new document. On error the document is unchanged.
    pub fn edit(&self, edit: &DocumentEdit) -> Result<ResumeDocument, DocumentError> {
        let mut current = self
            .inner
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let next = current.apply(edit)?;
        *current = next;
        Ok(current.clone())
    }

    pub fn template(&self) -> TemplateId {
        *self
            .inner
            .template
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn select_template(&self, template: TemplateId) {
        *self
            .inner
            .template
            .write()
            .unwrap_or_else(PoisonError::into_inner) = template;
        info!("Template switched to {}", template.as_str());
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn drain_notifications(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .inner
                .notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    pub fn action_states(&self) -> HashMap<ActionKind, ActionState> {
        let states = self
            .inner
            .actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        [ActionKind::Summarize, ActionKind::Save, ActionKind::Export]
            .into_iter()
            .map(|kind| (kind, states.get(&kind).copied().unwrap_or_default()))
            .collect()
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) -> Notification {
        let notification = Notification::new(level, message);
        self.inner
            .notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        notification
    }

    fn refuse_busy(&self, kind: ActionKind) -> Notification {
        warn!("{} dispatched while already pending", kind.label());
        self.notify(
            NotificationLevel::Warning,
            format!("{} is already in progress.", kind.label()),
        )
    }

    /// Asks the summarization service for a summary. On success the returned
    /// text replaces `summary` (kept as is when the response has none); on any
    /// failure `summary` becomes `FALLBACK_SUMMARY`.
    pub async fn summarize(&self) -> Notification {
        let Some(flight) = InFlight::begin(&self.inner.actions, ActionKind::Summarize) else {
            return self.refuse_busy(ActionKind::Summarize);
        };

        let describe = build_description(&self.document());

        match self.inner.summarizer.summarize(&describe).await {
            Ok(response) => {
                if let Some(summary) = response.summary {
                    self.write_summary(&summary);
                    info!("Summary updated from service ({} chars)", summary.len());
                } else {
                    info!("Summary service returned no summary; keeping previous value");
                }
                flight.finish(true);
                self.notify(NotificationLevel::Success, MSG_SUMMARY_OK)
            }
            Err(e) => {
                warn!("Summary generation failed, using fallback: {e}");
                self.write_summary(FALLBACK_SUMMARY);
                flight.finish(false);
                self.notify(NotificationLevel::Warning, MSG_SUMMARY_FALLBACK)
            }
        }
    }

    fn write_summary(&self, summary: &str) {
        let mut current = self
            .inner
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = current.set_summary(summary);
    }

    /// Ships the current document to the resume store. Never mutates it.
    pub async fn save(&self) -> Notification {
        let Some(flight) = InFlight::begin(&self.inner.actions, ActionKind::Save) else {
            return self.refuse_busy(ActionKind::Save);
        };

        let document = self.document();
        match self.inner.store.save(&document).await {
            Ok(()) => {
                info!("Resume saved");
                flight.finish(true);
                self.notify(NotificationLevel::Success, MSG_SAVE_OK)
            }
            Err(e) => {
                error!("Save to API failed: {e}");
                flight.finish(false);
                self.notify(NotificationLevel::Error, MSG_SAVE_FAILED)
            }
        }
    }

    /// Renders the preview with the selected template and exports it to PDF.
    pub async fn export(&self) -> ExportOutcome {
        let Some(flight) = InFlight::begin(&self.inner.actions, ActionKind::Export) else {
            return ExportOutcome {
                pdf: None,
                notification: self.refuse_busy(ActionKind::Export),
            };
        };

        self.notify(NotificationLevel::Info, MSG_EXPORT_STARTED);
        let document = self.document();
        let page = render_preview(&document, self.template());

        match self.inner.exporter.export(&page, &document).await {
            Ok(pdf) => {
                flight.finish(true);
                let notification = self.notify(
                    NotificationLevel::Success,
                    format!("PDF saved as {}", pdf.file_name),
                );
                ExportOutcome {
                    pdf: Some(pdf),
                    notification,
                }
            }
            Err(e) => {
                error!("PDF generation error: {e}");
                flight.finish(false);
                let message = export_failure_message(&e);
                ExportOutcome {
                    pdf: None,
                    notification: self.notify(NotificationLevel::Error, message),
                }
            }
        }
    }
}

fn export_failure_message(error: &ExportError) -> &'static str {
    match error {
        ExportError::PreviewNotFound => MSG_PREVIEW_NOT_FOUND,
        _ => MSG_EXPORT_FAILED,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::export::testing::FakeRasterizer;
    use super::testing::*;
    use super::*;
    use crate::render::fixtures::jane_doe;
    use tokio::sync::Notify;

    fn with_summary(behavior: SummaryBehavior) -> (EditorSession, Arc<FakeSummary>) {
        let summary = Arc::new(FakeSummary::new(behavior));
        let session = session(
            summary.clone(),
            Arc::new(FakeStore::with_status(200)),
            Arc::new(FakeRasterizer::new(10, 10)),
        );
        session.replace_document(jane_doe().set_summary(""));
        (session, summary)
    }

    #[tokio::test]
    async fn test_summarize_success_sets_returned_summary() {
        let (session, fake) =
            with_summary(SummaryBehavior::Reply(Some("A skilled engineer.".to_string())));

        let notification = session.summarize().await;

        assert_eq!(notification.message, MSG_SUMMARY_OK);
        assert_eq!(notification.level, NotificationLevel::Success);
        assert_eq!(session.document().summary, "A skilled engineer.");

        let sent = fake.requests.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Jane Doe has experience in: Engineer at Acme."));
        assert!(sent[0].contains("BSc from State U"));
        assert!(sent[0].contains("Skills: Go, Rust."));
    }

    #[tokio::test]
    async fn test_summarize_without_summary_keeps_previous() {
        let (session, _) = with_summary(SummaryBehavior::Reply(None));
        session
            .edit(&DocumentEdit::SetSummary {
                value: "Mine.".to_string(),
            })
            .unwrap();

        let notification = session.summarize().await;

        assert_eq!(notification.message, MSG_SUMMARY_OK);
        assert_eq!(session.document().summary, "Mine.");
    }

    #[tokio::test]
    async fn test_summarize_failure_writes_fallback() {
        let (session, _) = with_summary(SummaryBehavior::BadJson);

        let notification = session.summarize().await;

        assert_eq!(notification.message, MSG_SUMMARY_FALLBACK);
        assert_eq!(session.document().summary, FALLBACK_SUMMARY);
        assert_eq!(
            session.action_states()[&ActionKind::Summarize],
            ActionState::Failed
        );
    }

    #[tokio::test]
    async fn test_summarize_network_error_writes_fallback() {
        let (session, fake) = with_summary(SummaryBehavior::Unreachable);

        let notification = session.summarize().await;

        assert_eq!(notification.level, NotificationLevel::Warning);
        assert_eq!(notification.message, MSG_SUMMARY_FALLBACK);
        assert_eq!(session.document().summary, FALLBACK_SUMMARY);
        assert_eq!(fake.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_summarize_refuses_while_pending() {
        let release = Arc::new(Notify::new());
        let (session, fake) = with_summary(SummaryBehavior::Gated(
            release.clone(),
            "Late summary.".to_string(),
        ));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.summarize().await }
        });
        // Wait until the first call reaches the service.
        while fake.requests.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            session.action_states()[&ActionKind::Summarize],
            ActionState::Pending
        );

        let second = session.summarize().await;
        assert_eq!(second.level, NotificationLevel::Warning);
        assert!(second.message.contains("already in progress"));

        release.notify_one();
        let first = first.await.unwrap();
        assert_eq!(first.message, MSG_SUMMARY_OK);
        assert_eq!(session.document().summary, "Late summary.");
        assert_eq!(fake.requests.lock().unwrap().len(), 1);
        assert_eq!(
            session.action_states()[&ActionKind::Summarize],
            ActionState::Idle
        );
    }

    #[tokio::test]
    async fn test_save_success_does_not_alter_document() {
        let store = Arc::new(FakeStore::with_status(201));
        let session = session(
            Arc::new(FakeSummary::new(SummaryBehavior::Reply(None))),
            store.clone(),
            Arc::new(FakeRasterizer::new(10, 10)),
        );
        session.replace_document(jane_doe());

        let notification = session.save().await;

        assert_eq!(notification.message, MSG_SAVE_OK);
        assert_eq!(session.document(), jane_doe());
        assert_eq!(store.saved.lock().unwrap().as_slice(), &[jane_doe()]);
    }

    #[tokio::test]
    async fn test_save_failure_reports_and_leaves_document() {
        let session = session(
            Arc::new(FakeSummary::new(SummaryBehavior::Reply(None))),
            Arc::new(FakeStore::with_status(500)),
            Arc::new(FakeRasterizer::new(10, 10)),
        );
        session.replace_document(jane_doe());

        let notification = session.save().await;

        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, MSG_SAVE_FAILED);
        assert_eq!(session.document(), jane_doe());
    }

    #[tokio::test]
    async fn test_save_network_error_reports_and_leaves_document() {
        let store = Arc::new(FakeStore::unreachable());
        let session = session(
            Arc::new(FakeSummary::new(SummaryBehavior::Reply(None))),
            store.clone(),
            Arc::new(FakeRasterizer::new(10, 10)),
        );
        session.replace_document(jane_doe());

        let notification = session.save().await;

        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, MSG_SAVE_FAILED);
        assert_eq!(session.document(), jane_doe());
        assert_eq!(store.saved.lock().unwrap().len(), 1);
        assert_eq!(
            session.action_states()[&ActionKind::Save],
            ActionState::Failed
        );
    }

    #[tokio::test]
    async fn test_export_uses_selected_template_and_names_file() {
        let rasterizer = Arc::new(FakeRasterizer::new(100, 200));
        let session = session(
            Arc::new(FakeSummary::new(SummaryBehavior::Reply(None))),
            Arc::new(FakeStore::with_status(200)),
            rasterizer.clone(),
        );
        session.replace_document(jane_doe());
        session.select_template(TemplateId::Executive);

        let outcome = session.export().await;

        assert_eq!(rasterizer.calls(), 1);
        let pdf = outcome.pdf.unwrap();
        assert_eq!(pdf.file_name, "Jane Doe.pdf");
        assert_eq!(outcome.notification.message, "PDF saved as Jane Doe.pdf");

        let log: Vec<_> = session
            .notifications()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(log, vec![MSG_EXPORT_STARTED, "PDF saved as Jane Doe.pdf"]);
    }

    #[tokio::test]
    async fn test_export_failure_is_reported() {
        let session = session(
            Arc::new(FakeSummary::new(SummaryBehavior::Reply(None))),
            Arc::new(FakeStore::with_status(200)),
            Arc::new(FakeRasterizer::failing()),
        );

        let outcome = session.export().await;

        assert!(outcome.pdf.is_none());
        assert_eq!(outcome.notification.message, MSG_EXPORT_FAILED);
        assert_eq!(
            session.action_states()[&ActionKind::Export],
            ActionState::Failed
        );
    }

    #[test]
    fn test_export_failure_messages() {
        assert_eq!(
            export_failure_message(&ExportError::PreviewNotFound),
            MSG_PREVIEW_NOT_FOUND
        );
        assert_eq!(
            export_failure_message(&ExportError::Rasterize("boom".to_string())),
            MSG_EXPORT_FAILED
        );
        assert_eq!(
            export_failure_message(&ExportError::EmptyRaster),
            MSG_EXPORT_FAILED
        );
    }

    #[test]
    fn test_failed_edit_leaves_document_unchanged() {
        let session = default_session();
        let before = session.document();
        let err = session
            .edit(&DocumentEdit::RemoveEducation {
                id: "nope".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, DocumentError::EntryNotFound { .. }));
        assert_eq!(session.document(), before);
    }

    #[test]
    fn test_drain_notifications_empties_log() {
        let session = default_session();
        session.notify(NotificationLevel::Info, "hello");
        assert_eq!(session.drain_notifications().len(), 1);
        assert!(session.notifications().is_empty());
    }
}
