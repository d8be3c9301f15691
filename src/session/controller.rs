//! Edit session lifecycle.
//!
//! Owns the closed/new/editing state machine, the pre-edit snapshot, and slug
//! suggestion refreshes. Slug requests run as spawned tasks and report back
//! through a channel; the owner applies them with [`EditColumnController::next_event`],
//! [`EditColumnController::poll_events`] or [`EditColumnController::settle`].
//! Responses are applied in completion order, so an older request that finishes
//! last wins.

use super::context::ReportContext;
use super::slug::SlugClient;
use crate::column::{Column, FilterCatalog};
use crate::model::{ColumnRecord, FilterRecord, SessionEvent, SessionMode, SessionReport};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Construction-time configuration of a controller.
#[derive(Debug)]
pub struct ControllerOptions {
    pub slug_client: SlugClient,
    pub report_context: ReportContext,
    pub available_filters: Vec<FilterRecord>,
}

/// The live column only exists while a session is open; the snapshot only while editing.
#[derive(Debug)]
enum Session {
    Closed,
    New {
        column: Column,
    },
    Editing {
        column: Column,
        old_column: ColumnRecord,
    },
}

#[derive(Debug)]
pub struct EditColumnController {
    slug_client: SlugClient,
    report_context: ReportContext,
    available_filters: FilterCatalog,
    slug_options: Vec<String>,
    session: Session,
    next_request_id: u64,
    last_applied_request: Option<u64>,
    in_flight: usize,
    event_tx: UnboundedSender<SessionEvent>,
    event_rx: UnboundedReceiver<SessionEvent>,
}

impl EditColumnController {
    pub fn new(options: ControllerOptions) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            slug_client: options.slug_client,
            report_context: options.report_context,
            available_filters: FilterCatalog::from_records(options.available_filters),
            slug_options: Vec::new(),
            session: Session::Closed,
            next_request_id: 0,
            last_applied_request: None,
            in_flight: 0,
            event_tx,
            event_rx,
        }
    }

    /// Open (or re-enter) "create column" mode.
    ///
    /// Re-entering while already in new mode keeps the draft, rebuilt against the
    /// catalog. Coming from closed or editing mode starts from a blank column.
    pub fn set_new(&mut self) {
        self.reload_options();
        self.session = match std::mem::replace(&mut self.session, Session::Closed) {
            Session::New { column } => {
                debug!("re-entering new column mode, keeping draft");
                Session::New {
                    column: Column::new(column.unwrap(), Some(&self.available_filters)),
                }
            }
            _ => {
                debug!("opening new column");
                Session::New {
                    column: Column::blank(Some(&self.available_filters)),
                }
            }
        };
    }

    /// Start editing `existing`. The snapshot and the live column are both taken
    /// from `existing.unwrap()`; only the live column is bound to the catalog.
    pub fn set(&mut self, existing: &Column) {
        self.reload_options();
        let old_column = existing.unwrap();
        let column = Column::new(existing.unwrap(), Some(&self.available_filters));
        debug!(slug = column.slug(), "editing existing column");
        self.session = Session::Editing { column, old_column };
    }

    /// Close the session. In-flight slug requests are not cancelled.
    pub fn unset(&mut self) {
        debug!(mode = self.mode().as_str(), "closing column session");
        self.session = Session::Closed;
    }

    /// Request fresh slug suggestions for the current report context.
    ///
    /// Returns the request id. Must be called from within a Tokio runtime.
    pub fn reload_options(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight += 1;

        let report_context = self.report_context.current();
        let client = self.slug_client.clone();
        let tx = self.event_tx.clone();
        debug!(request_id, "requesting slug options");
        tokio::spawn(async move {
            let event = match client.fetch_options(&report_context).await {
                Ok(options) => SessionEvent::SlugOptionsLoaded {
                    request_id,
                    options,
                },
                Err(e) => SessionEvent::SlugOptionsFailed {
                    request_id,
                    message: format!("{e:#}"),
                },
            };
            let _ = tx.send(event);
        });
        request_id
    }

    /// Wait for the next slug request to complete and apply it.
    /// Returns `None` when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.event_rx.recv().await?;
        self.apply(&event);
        Some(event)
    }

    /// Apply every completed slug request without waiting. Returns how many were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(&event);
            applied += 1;
        }
        applied
    }

    /// Wait until every in-flight slug request has completed.
    pub async fn settle(&mut self) {
        while self.next_event().await.is_some() {}
    }

    fn apply(&mut self, event: &SessionEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            SessionEvent::SlugOptionsLoaded {
                request_id,
                options,
            } => {
                if let Some(newer) = self.last_applied_request.filter(|last| last > request_id) {
                    debug!(
                        request_id,
                        newer, "slug options from an older request replace newer ones"
                    );
                }
                debug!(request_id, count = options.len(), "slug options loaded");
                self.last_applied_request = Some(*request_id);
                self.slug_options = options.clone();
            }
            SessionEvent::SlugOptionsFailed {
                request_id,
                message,
            } => {
                warn!(request_id, error = %message, "slug options request failed");
            }
        }
    }

    pub fn mode(&self) -> SessionMode {
        match self.session {
            Session::Closed => SessionMode::Closed,
            Session::New { .. } => SessionMode::New,
            Session::Editing { .. } => SessionMode::Editing,
        }
    }

    /// `Some(true)` in new mode, `Some(false)` while editing, `None` when closed.
    pub fn is_new(&self) -> Option<bool> {
        match self.session {
            Session::Closed => None,
            Session::New { .. } => Some(true),
            Session::Editing { .. } => Some(false),
        }
    }

    pub fn column(&self) -> Option<&Column> {
        match &self.session {
            Session::Closed => None,
            Session::New { column } | Session::Editing { column, .. } => Some(column),
        }
    }

    pub fn column_mut(&mut self) -> Option<&mut Column> {
        match &mut self.session {
            Session::Closed => None,
            Session::New { column } | Session::Editing { column, .. } => Some(column),
        }
    }

    pub fn old_column(&self) -> Option<&ColumnRecord> {
        match &self.session {
            Session::Editing { old_column, .. } => Some(old_column),
            _ => None,
        }
    }

    pub fn available_filters(&self) -> &FilterCatalog {
        &self.available_filters
    }

    pub fn slug_options(&self) -> &[String] {
        &self.slug_options
    }

    pub fn report_context(&self) -> serde_json::Value {
        self.report_context.current()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_column_valid(&self) -> bool {
        self.column()
            .is_some_and(|column| !column.title().is_empty() && !column.slug().is_empty())
    }

    pub fn is_save_disabled(&self) -> bool {
        !self.is_column_valid()
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            mode: self.mode(),
            column: self.column().map(Column::unwrap),
            old_column: self.old_column().cloned(),
            slug_options: self.slug_options.clone(),
            is_column_valid: self.is_column_valid(),
            is_save_disabled: self.is_save_disabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{FilterKey, FilterRef};
    use crate::model::AppliedFilterRecord;
    use crate::test_support::{catalog_records, config_for, spawn_slug_server};
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    async fn controller_with(context: ReportContext) -> EditColumnController {
        let base = spawn_slug_server().await;
        let slug_client = SlugClient::new(&config_for(&format!("{base}/slugs"))).expect("client");
        EditColumnController::new(ControllerOptions {
            slug_client,
            report_context: context,
            available_filters: catalog_records(),
        })
    }

    async fn controller() -> EditColumnController {
        controller_with(ReportContext::fixed(json!({"tag": "cases"}))).await
    }

    fn saved_column() -> Column {
        let record: ColumnRecord = serde_json::from_value(json!({
            "title": "Status",
            "slug": "status",
            "width": 150,
            "appliedFilters": [
                {"filter": {"name": "status", "filterType": "choice"}, "value": "open"},
                {"filter": {"name": "retired", "filterType": "text"}, "value": "x"}
            ]
        }))
        .expect("record");
        Column::new(record, None)
    }

    #[tokio::test]
    async fn starts_closed_and_invalid() {
        let controller = controller().await;
        assert_eq!(controller.mode(), SessionMode::Closed);
        assert_eq!(controller.is_new(), None);
        assert!(controller.column().is_none());
        assert!(controller.old_column().is_none());
        assert!(!controller.is_column_valid());
        assert!(controller.is_save_disabled());
        assert_eq!(controller.available_filters().len(), 3);
        assert!(controller.slug_options().is_empty());
    }

    #[tokio::test]
    async fn validity_tracks_title_and_slug() {
        let mut controller = controller().await;
        controller.set_new();
        assert_eq!(controller.is_new(), Some(true));
        assert!(!controller.is_column_valid());

        let column = controller.column_mut().expect("open column");
        column.set_slug("cases");
        assert!(!controller.is_column_valid());

        controller.column_mut().expect("open column").set_title("Cases");
        assert!(controller.is_column_valid());
        assert!(!controller.is_save_disabled());

        controller.column_mut().expect("open column").set_slug("");
        assert!(!controller.is_column_valid());
        assert!(controller.is_save_disabled());
    }

    #[tokio::test]
    async fn reentering_new_keeps_the_draft() {
        let mut controller = controller().await;
        controller.set_new();
        let draft = controller.column_mut().expect("draft");
        draft.set_title("Draft");
        draft.add_filter(AppliedFilterRecord {
            filter: Some(FilterRecord::new("owner", "user")),
            ..Default::default()
        });

        controller.set_new();

        let column = controller.column().expect("draft kept");
        assert_eq!(column.title(), "Draft");
        assert_eq!(
            column.applied_filters()[0].handle(),
            controller
                .available_filters()
                .find(&FilterKey::new("owner", "user"))
        );
        assert!(column
            .catalog()
            .expect("bound")
            .same_catalog(controller.available_filters()));
        assert!(controller.old_column().is_none());
    }

    #[tokio::test]
    async fn filters_added_to_a_fresh_column_share_catalog_entries() {
        let mut controller = controller().await;
        controller.set_new();
        let index = controller
            .column_mut()
            .expect("new column")
            .add_filter(AppliedFilterRecord {
                filter: Some(FilterRecord::new("status", "choice")),
                ..Default::default()
            });

        let catalog = controller.available_filters().clone();
        let handle = controller.column().expect("new column").applied_filters()[index]
            .handle()
            .expect("bound to catalog");
        assert_eq!(handle, catalog.find(&FilterKey::new("status", "choice")).expect("entry"));

        catalog.update(handle, |def| {
            def.config_mut().insert("choices".into(), json!(["open"]));
        });
        let def = controller
            .column()
            .expect("new column")
            .filter_definition(index)
            .expect("definition");
        assert_eq!(def.config()["choices"], json!(["open"]));
    }

    #[tokio::test]
    async fn new_from_editing_starts_blank() {
        let mut controller = controller().await;
        controller.set(&saved_column());
        assert_eq!(controller.is_new(), Some(false));

        controller.set_new();

        assert_eq!(controller.mode(), SessionMode::New);
        let column = controller.column().expect("blank column");
        assert_eq!(column.title(), "");
        assert!(column.applied_filters().is_empty());
        assert!(controller.old_column().is_none());
    }

    #[tokio::test]
    async fn editing_binds_live_column_and_freezes_snapshot() {
        let mut controller = controller().await;
        let existing = saved_column();
        controller.set(&existing);

        assert_eq!(controller.mode(), SessionMode::Editing);
        assert_eq!(controller.old_column(), Some(&existing.unwrap()));
        assert!(controller.is_column_valid());

        let column = controller.column().expect("live column");
        let handle = column.applied_filters()[0].handle().expect("status bound");
        assert_eq!(
            Some(handle),
            controller
                .available_filters()
                .find(&FilterKey::new("status", "choice"))
        );
        assert_eq!(column.applied_filters()[1].filter_ref(), &FilterRef::Unset);

        controller.column_mut().expect("live column").set_title("Renamed");
        let snapshot = controller.old_column().expect("snapshot");
        assert_eq!(snapshot.title.as_deref(), Some("Status"));
        assert_eq!(snapshot.width, Some(150));
        assert_eq!(
            snapshot.applied_filters[1]
                .filter
                .as_ref()
                .map(|f| f.name.as_str()),
            Some("retired")
        );
    }

    #[tokio::test]
    async fn unset_clears_everything() {
        let mut controller = controller().await;
        controller.set(&saved_column());
        controller.unset();

        assert_eq!(controller.mode(), SessionMode::Closed);
        assert!(controller.old_column().is_none());
        assert!(controller.column().is_none());
        assert!(controller.column_mut().is_none());
        assert_eq!(controller.is_new(), None);
        assert!(!controller.is_column_valid());
    }

    #[tokio::test]
    async fn opening_a_session_loads_slug_options() {
        let context = Rc::new(RefCell::new(json!({"tag": "visits", "columns": 2})));
        let reader = context.clone();
        let mut controller =
            controller_with(ReportContext::from_fn(move || reader.borrow().clone())).await;

        controller.set_new();
        assert_eq!(controller.in_flight(), 1);
        controller.settle().await;
        assert_eq!(controller.slug_options(), ["visits", "visits_2"]);

        *context.borrow_mut() = json!({"tag": "forms"});
        controller.reload_options();
        let event = controller.next_event().await.expect("completion");
        assert!(matches!(event, SessionEvent::SlugOptionsLoaded { .. }));
        assert_eq!(controller.slug_options(), ["forms"]);
        assert_eq!(controller.report_context(), json!({"tag": "forms"}));
        assert!(controller.next_event().await.is_none());
    }

    #[tokio::test]
    async fn failed_request_keeps_previous_options() {
        let base = spawn_slug_server().await;
        let mut controller = controller().await;
        controller.set_new();
        controller.settle().await;
        assert_eq!(controller.slug_options(), ["cases"]);

        controller.slug_client =
            SlugClient::new(&config_for(&format!("{base}/broken"))).expect("client");
        controller.reload_options();
        let event = controller.next_event().await.expect("completion");

        assert!(matches!(event, SessionEvent::SlugOptionsFailed { .. }));
        assert_eq!(controller.slug_options(), ["cases"]);
        assert_eq!(controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn slower_older_request_wins() {
        let context = Rc::new(RefCell::new(json!({"tag": "first", "delay_ms": 300})));
        let reader = context.clone();
        let mut controller =
            controller_with(ReportContext::from_fn(move || reader.borrow().clone())).await;

        let first = controller.reload_options();
        *context.borrow_mut() = json!({"tag": "second"});
        let second = controller.reload_options();

        let done = controller.next_event().await.expect("first completion");
        assert_eq!(done.request_id(), second);
        assert_eq!(controller.slug_options(), ["second"]);

        let done = controller.next_event().await.expect("second completion");
        assert_eq!(done.request_id(), first);
        assert_eq!(controller.slug_options(), ["first"]);
    }

    #[tokio::test]
    async fn late_response_after_unset_still_lands() {
        let mut controller = controller().await;
        controller.set(&saved_column());
        controller.unset();
        assert_eq!(controller.in_flight(), 1);

        controller.settle().await;
        assert_eq!(controller.slug_options(), ["cases"]);
        assert_eq!(controller.mode(), SessionMode::Closed);
    }

    #[tokio::test]
    async fn poll_applies_only_finished_requests() {
        let mut controller = controller().await;
        assert_eq!(controller.poll_events(), 0);

        controller.reload_options();
        controller.settle().await;
        assert_eq!(controller.poll_events(), 0);
        assert_eq!(controller.slug_options(), ["cases"]);
    }

    #[tokio::test]
    async fn report_reflects_session() {
        let mut controller = controller().await;
        controller.set(&saved_column());
        controller.settle().await;

        let report = controller.report();
        assert_eq!(report.mode, SessionMode::Editing);
        assert!(report.is_column_valid);
        assert!(!report.is_save_disabled);
        assert_eq!(report.slug_options, vec!["cases".to_string()]);

        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(value["mode"], json!("editing"));
        assert_eq!(value["oldColumn"]["slug"], json!("status"));
        assert_eq!(value["column"]["appliedFilters"][1]["filter"], Value::Null);
    }
}
