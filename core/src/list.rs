//! Todo list container.
//!
//! # Design
//! The container does not own the todos. The root shell passes its
//! `TodoCollection` in, and the container is the only code path that
//! reconciles it with server acknowledgments: `finish_load` replaces it,
//! `apply_update` and `apply_delete` patch it without a re-fetch.
//!
//! Loads share one in-flight flag; a second load (mount or manual refresh)
//! requested while one is outstanding is ignored.

use std::collections::HashMap;
use std::time::Instant;

use crate::busy::{BusyFlag, BusyGuard};
use crate::client::{send, TodoClient};
use crate::collection::{Counts, TodoCollection};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::message::{MessageSlot, Tone};
use crate::row::{RowEvent, TodoRow};
use crate::types::{Todo, TodoId};

pub const REFRESHED_MESSAGE: &str = "Todos refreshed successfully!";
pub const CANCELLED_MESSAGE: &str = "Request cancelled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// Initial, mount-triggered load.
    Loading,
    /// User-triggered reload; the current list stays visible.
    Refreshing,
    Ready,
    /// The list is replaced by this message and a retry affordance.
    Failed(String),
}

#[derive(Debug)]
pub struct PendingLoad {
    manual: bool,
    /// Status to restore if the load is cancelled.
    previous: ListStatus,
    request: HttpRequest,
    _guard: BusyGuard,
}

impl PendingLoad {
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

/// What a renderer needs for one frame.
#[derive(Debug)]
pub struct ListView<'a> {
    pub status: &'a ListStatus,
    pub counts: Counts,
    pub pending: Vec<&'a Todo>,
    /// Empty while the completed section is collapsed.
    pub completed: Vec<&'a Todo>,
    pub show_completed: bool,
    pub message: Option<&'a str>,
}

#[derive(Debug)]
pub struct TodoList {
    status: ListStatus,
    in_flight: BusyFlag,
    message: MessageSlot,
    show_completed: bool,
    rows: HashMap<TodoId, TodoRow>,
}

impl Default for TodoList {
    fn default() -> Self {
        Self {
            status: ListStatus::Loading,
            in_flight: BusyFlag::new(),
            message: MessageSlot::default(),
            show_completed: false,
            rows: HashMap::new(),
        }
    }
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub fn message(&self) -> &MessageSlot {
        &self.message
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    pub fn toggle_completed(&mut self) {
        self.show_completed = !self.show_completed;
    }

    pub fn row(&self, id: &TodoId) -> Option<&TodoRow> {
        self.rows.get(id)
    }

    pub fn row_mut(&mut self, id: &TodoId) -> &mut TodoRow {
        self.rows.entry(id.clone()).or_default()
    }

    pub fn tick(&mut self, now: Instant) {
        self.message.tick(now);
        for row in self.rows.values_mut() {
            row.tick(now);
        }
    }

    pub fn begin_load(&mut self, client: &TodoClient, manual: bool) -> Option<PendingLoad> {
        let Some(guard) = self.in_flight.try_acquire() else {
            tracing::debug!(manual, "load ignored, another load is in flight");
            return None;
        };
        let next = if manual {
            ListStatus::Refreshing
        } else {
            ListStatus::Loading
        };
        let previous = std::mem::replace(&mut self.status, next);
        self.message.clear();
        Some(PendingLoad {
            manual,
            previous,
            request: client.build_list_todos(),
            _guard: guard,
        })
    }

    pub fn finish_load(
        &mut self,
        client: &TodoClient,
        todos: &mut TodoCollection,
        pending: PendingLoad,
        outcome: Result<HttpResponse, ApiError>,
        now: Instant,
    ) {
        let manual = pending.manual;
        drop(pending);
        match outcome.and_then(|response| client.parse_list_todos(response)) {
            Ok(fetched) => {
                tracing::debug!(count = fetched.len(), manual, "todos loaded");
                todos.replace_all(fetched);
                self.rows.retain(|id, _| todos.contains(id));
                self.status = ListStatus::Ready;
                if manual {
                    self.message.show(Tone::Success, REFRESHED_MESSAGE, now);
                }
            }
            Err(err) => {
                tracing::error!(error = %err, manual, "error fetching todos");
                self.status = ListStatus::Failed(format!("Failed to connect to server. {err}"));
                self.message.clear();
            }
        }
    }

    /// Abandon an in-flight load. Its response, if it ever arrives, has no
    /// pending handle left to be applied with.
    ///
    /// The status the load replaced comes back, so a cancelled retry keeps
    /// the error screen. A list that never finished loading fails with
    /// `CANCELLED_MESSAGE`.
    pub fn cancel_load(&mut self, pending: PendingLoad) {
        let PendingLoad {
            manual, previous, ..
        } = pending;
        tracing::debug!(manual, ?previous, "load cancelled");
        self.status = match previous {
            ListStatus::Loading | ListStatus::Refreshing => {
                ListStatus::Failed(CANCELLED_MESSAGE.to_string())
            }
            other => other,
        };
    }

    /// Run a load through `transport`. Returns `false` if it was ignored.
    pub fn load<T: Transport>(
        &mut self,
        client: &TodoClient,
        transport: &T,
        todos: &mut TodoCollection,
        manual: bool,
        now: Instant,
    ) -> bool {
        let Some(pending) = self.begin_load(client, manual) else {
            return false;
        };
        let outcome = send(transport, pending.request());
        self.finish_load(client, todos, pending, outcome, now);
        true
    }

    pub fn apply_update(&mut self, todos: &mut TodoCollection, id: &TodoId) -> bool {
        todos.mark_completed(id)
    }

    pub fn apply_delete(&mut self, todos: &mut TodoCollection, id: &TodoId) -> bool {
        self.rows.remove(id);
        todos.remove(id).is_some()
    }

    pub fn apply(&mut self, todos: &mut TodoCollection, event: &RowEvent) -> bool {
        match event {
            RowEvent::Completed(id) => self.apply_update(todos, id),
            RowEvent::Deleted(id) => self.apply_delete(todos, id),
        }
    }

    pub fn view<'a>(&'a self, todos: &'a TodoCollection) -> ListView<'a> {
        let completed = if self.show_completed {
            todos.completed().collect()
        } else {
            Vec::new()
        };
        ListView {
            status: &self.status,
            counts: todos.counts(),
            pending: todos.pending().collect(),
            completed,
            show_completed: self.show_completed,
            message: self.message.text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:5000")
    }

    const TWO_TODOS: &str = r#"[
        {"id":"1","body":"buy milk","completed":false},
        {"id":"2","body":"walk dog","completed":true}
    ]"#;

    #[test]
    fn starts_in_loading_state() {
        let list = TodoList::new();
        assert_eq!(list.status(), &ListStatus::Loading);
        assert!(!list.is_loading());
    }

    #[test]
    fn single_pending_todo_scenario() {
        let transport = ScriptedTransport::new()
            .respond(200, r#"[{"id":"1","body":"buy milk","completed":false}]"#);
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();

        assert!(list.load(&client(), &transport, &mut todos, false, Instant::now()));
        let view = list.view(&todos);
        assert_eq!(view.status, &ListStatus::Ready);
        assert_eq!(view.pending.len(), 1);
        assert_eq!(view.pending[0].body, "buy milk");
        assert_eq!(
            view.counts,
            Counts {
                total: 1,
                completed: 0,
                pending: 1
            }
        );
        assert_eq!(view.message, None);
    }

    #[test]
    fn load_replaces_whole_collection() {
        let transport = ScriptedTransport::new().respond(200, TWO_TODOS);
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();
        todos.insert(Todo {
            id: TodoId::from("stale"),
            body: "gone".to_string(),
            completed: false,
        });
        list.row_mut(&TodoId::from("stale"));

        list.load(&client(), &transport, &mut todos, false, Instant::now());
        assert_eq!(todos.len(), 2);
        assert!(!todos.contains(&TodoId::from("stale")));
        assert!(list.row(&TodoId::from("stale")).is_none());
    }

    #[test]
    fn manual_refresh_shows_message() {
        let transport = ScriptedTransport::new().respond(200, "[]");
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();

        list.load(&client(), &transport, &mut todos, true, Instant::now());
        assert_eq!(list.status(), &ListStatus::Ready);
        assert_eq!(list.message().text(), Some(REFRESHED_MESSAGE));
    }

    #[test]
    fn failed_load_keeps_previous_todos_and_offers_retry() {
        let transport = ScriptedTransport::new()
            .fail("connection refused")
            .respond(200, TWO_TODOS);
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();

        list.load(&client(), &transport, &mut todos, false, Instant::now());
        assert_eq!(
            list.status(),
            &ListStatus::Failed(
                "Failed to connect to server. network error: connection refused".to_string()
            )
        );
        assert!(!list.is_loading());

        list.load(&client(), &transport, &mut todos, true, Instant::now());
        assert_eq!(list.status(), &ListStatus::Ready);
        assert_eq!(todos.len(), 2);
    }

    #[test]
    fn server_error_on_load_uses_status_line() {
        let transport = ScriptedTransport::new().respond(503, "upstream down");
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();

        list.load(&client(), &transport, &mut todos, false, Instant::now());
        assert_eq!(
            list.status(),
            &ListStatus::Failed(
                "Failed to connect to server. HTTP 503 : Service Unavailable".to_string()
            )
        );
    }

    #[test]
    fn overlapping_refresh_is_ignored() {
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();
        let transport = ScriptedTransport::new();

        let pending = list.begin_load(&client(), false).unwrap();
        assert!(list.is_loading());
        assert!(list.begin_load(&client(), true).is_none());
        assert!(!list.load(&client(), &transport, &mut todos, true, Instant::now()));
        assert_eq!(transport.request_count(), 0);
        assert_eq!(list.status(), &ListStatus::Loading);

        list.finish_load(
            &client(),
            &mut todos,
            pending,
            Ok(HttpResponse::new(200, "[]")),
            Instant::now(),
        );
        assert!(!list.is_loading());
        assert!(list.begin_load(&client(), true).is_some());
    }

    #[test]
    fn cancelled_load_never_touches_collection() {
        let transport = ScriptedTransport::new()
            .respond(200, r#"[{"id":"1","body":"keep","completed":false}]"#);
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();

        let pending = list.begin_load(&client(), false).unwrap();
        list.cancel_load(pending);
        assert_eq!(
            list.status(),
            &ListStatus::Failed(CANCELLED_MESSAGE.to_string())
        );
        assert!(!list.is_loading());

        list.load(&client(), &transport, &mut todos, true, Instant::now());
        let pending = list.begin_load(&client(), true).unwrap();
        assert_eq!(list.status(), &ListStatus::Refreshing);
        list.cancel_load(pending);
        assert_eq!(list.status(), &ListStatus::Ready);
        assert!(!list.is_loading());
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn cancelled_retry_keeps_error_screen() {
        let transport = ScriptedTransport::new().fail("connection refused");
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();

        list.load(&client(), &transport, &mut todos, false, Instant::now());
        let failed = ListStatus::Failed(
            "Failed to connect to server. network error: connection refused".to_string(),
        );
        assert_eq!(list.status(), &failed);

        let pending = list.begin_load(&client(), true).unwrap();
        assert_eq!(list.status(), &ListStatus::Refreshing);
        list.cancel_load(pending);
        assert_eq!(list.status(), &failed);
        assert!(!list.is_loading());
        assert!(todos.is_empty());
        assert!(list.begin_load(&client(), true).is_some());
    }

    #[test]
    fn row_events_reconcile_without_refetch() {
        let transport = ScriptedTransport::new().respond(200, TWO_TODOS);
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();
        list.load(&client(), &transport, &mut todos, false, Instant::now());

        assert!(list.apply(&mut todos, &RowEvent::Completed(TodoId::from("1"))));
        assert_eq!(todos.counts().completed, 2);

        assert!(list.apply(&mut todos, &RowEvent::Deleted(TodoId::from("2"))));
        assert_eq!(todos.len(), 1);
        assert!(todos.contains(&TodoId::from("1")));
        assert!(!list.apply(&mut todos, &RowEvent::Deleted(TodoId::from("2"))));
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn completed_section_is_collapsed_by_default() {
        let transport = ScriptedTransport::new().respond(200, TWO_TODOS);
        let mut list = TodoList::new();
        let mut todos = TodoCollection::default();
        list.load(&client(), &transport, &mut todos, false, Instant::now());

        let view = list.view(&todos);
        assert!(!view.show_completed);
        assert!(view.completed.is_empty());
        assert_eq!(view.counts.completed, 1);

        list.toggle_completed();
        let view = list.view(&todos);
        assert_eq!(view.completed.len(), 1);
        assert_eq!(view.completed[0].body, "walk dog");
        assert_eq!(view.pending[0].body, "buy milk");
    }
}
