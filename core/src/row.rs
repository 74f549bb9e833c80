//! Per-todo action state.
//!
//! A row has two busy flags, one per action. Each action refuses to start
//! while either flag is set so a todo is never completed and deleted at the
//! same time.

use std::time::Instant;

use crate::busy::{BusyFlag, BusyGuard};
use crate::client::{send, TodoClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::message::{MessageSlot, Tone};
use crate::types::{Todo, TodoId};

pub const ALREADY_COMPLETED_MESSAGE: &str = "Todo already completed";
pub const COMPLETED_MESSAGE: &str = "Todo marked as completed!";
pub const DELETED_MESSAGE: &str = "Todo deleted successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Complete,
    Delete,
}

/// Reported to the list container after the server acknowledged an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    Completed(TodoId),
    Deleted(TodoId),
}

#[derive(Debug)]
pub struct PendingRowAction {
    id: TodoId,
    action: RowAction,
    request: HttpRequest,
    _guard: BusyGuard,
}

impl PendingRowAction {
    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn action(&self) -> RowAction {
        self.action
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

#[derive(Debug, Default)]
pub struct TodoRow {
    completing: BusyFlag,
    deleting: BusyFlag,
    message: MessageSlot,
}

impl TodoRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completing(&self) -> bool {
        self.completing.is_busy()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_busy()
    }

    fn is_busy(&self) -> bool {
        self.is_completing() || self.is_deleting()
    }

    pub fn message(&self) -> &MessageSlot {
        &self.message
    }

    pub fn tick(&mut self, now: Instant) {
        self.message.tick(now);
    }

    /// Start marking `todo` completed. An already completed todo only gets
    /// an informational message.
    pub fn begin_complete(
        &mut self,
        client: &TodoClient,
        todo: &Todo,
        now: Instant,
    ) -> Option<PendingRowAction> {
        if todo.completed {
            self.message.show(Tone::Info, ALREADY_COMPLETED_MESSAGE, now);
            return None;
        }
        if self.is_busy() {
            tracing::debug!(id = %todo.id, "complete ignored, row busy");
            return None;
        }
        let guard = self.completing.try_acquire()?;
        self.message.clear();
        Some(PendingRowAction {
            id: todo.id.clone(),
            action: RowAction::Complete,
            request: client.build_complete_todo(&todo.id),
            _guard: guard,
        })
    }

    pub fn begin_delete(&mut self, client: &TodoClient, todo: &Todo) -> Option<PendingRowAction> {
        if self.is_busy() {
            tracing::debug!(id = %todo.id, "delete ignored, row busy");
            return None;
        }
        let guard = self.deleting.try_acquire()?;
        self.message.clear();
        Some(PendingRowAction {
            id: todo.id.clone(),
            action: RowAction::Delete,
            request: client.build_delete_todo(&todo.id),
            _guard: guard,
        })
    }

    pub fn finish(
        &mut self,
        client: &TodoClient,
        pending: PendingRowAction,
        outcome: Result<HttpResponse, ApiError>,
        now: Instant,
    ) -> Option<RowEvent> {
        let PendingRowAction { id, action, .. } = pending;
        let result = outcome.and_then(|response| match action {
            RowAction::Complete => client.parse_complete_todo(response),
            RowAction::Delete => client.parse_delete_todo(response),
        });
        match (action, result) {
            (RowAction::Complete, Ok(())) => {
                self.message.show(Tone::Success, COMPLETED_MESSAGE, now);
                Some(RowEvent::Completed(id))
            }
            (RowAction::Delete, Ok(())) => {
                self.message.show(Tone::Success, DELETED_MESSAGE, now);
                Some(RowEvent::Deleted(id))
            }
            (action, Err(err)) => {
                tracing::error!(%id, ?action, error = %err, "todo action failed");
                self.message.show(Tone::Error, format!("Error: {err}"), now);
                None
            }
        }
    }

    pub fn complete<T: Transport>(
        &mut self,
        client: &TodoClient,
        transport: &T,
        todo: &Todo,
        now: Instant,
    ) -> Option<RowEvent> {
        let pending = self.begin_complete(client, todo, now)?;
        let outcome = send(transport, pending.request());
        self.finish(client, pending, outcome, now)
    }

    pub fn delete<T: Transport>(
        &mut self,
        client: &TodoClient,
        transport: &T,
        todo: &Todo,
        now: Instant,
    ) -> Option<RowEvent> {
        let pending = self.begin_delete(client, todo)?;
        let outcome = send(transport, pending.request());
        self.finish(client, pending, outcome, now)
    }
}
