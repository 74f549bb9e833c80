//! Todo creation form.
//!
//! `Idle → Submitting → Idle`. The submitting state is the busy flag itself,
//! so it cannot outlive the pending submission that set it.

use std::time::Instant;

use crate::busy::{BusyFlag, BusyGuard};
use crate::client::{send, TodoClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::message::{MessageSlot, Tone};
use crate::types::Todo;

pub const CREATED_MESSAGE: &str = "Todo added successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
}

/// A create request that has been validated and is awaiting its response.
#[derive(Debug)]
pub struct PendingCreate {
    request: HttpRequest,
    _guard: BusyGuard,
}

impl PendingCreate {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

#[derive(Debug, Default)]
pub struct TodoForm {
    input: String,
    submitting: BusyFlag,
    message: MessageSlot,
}

impl TodoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn state(&self) -> FormState {
        if self.submitting.is_busy() {
            FormState::Submitting
        } else {
            FormState::Idle
        }
    }

    pub fn message(&self) -> &MessageSlot {
        &self.message
    }

    pub fn tick(&mut self, now: Instant) {
        self.message.tick(now);
    }

    /// Validate the input and start a submission.
    ///
    /// Returns `None` without touching the network when a submission is
    /// already in flight or when the trimmed input is empty; the latter also
    /// shows the validation message.
    pub fn begin_submit(&mut self, client: &TodoClient, now: Instant) -> Option<PendingCreate> {
        if self.submitting.is_busy() {
            tracing::debug!("submit ignored, create already in flight");
            return None;
        }
        let request = match client.build_create_todo(&self.input) {
            Ok(request) => request,
            Err(ApiError::Validation(msg)) => {
                tracing::warn!(%msg, "create rejected locally");
                self.message.show(Tone::Warning, msg, now);
                return None;
            }
            Err(err) => {
                self.fail(&err, now);
                return None;
            }
        };
        let guard = self.submitting.try_acquire()?;
        self.message.clear();
        Some(PendingCreate {
            request,
            _guard: guard,
        })
    }

    /// Apply the outcome of a submission. Returns the created todo, which the
    /// owner of the collection is expected to insert.
    pub fn finish_submit(
        &mut self,
        client: &TodoClient,
        pending: PendingCreate,
        outcome: Result<HttpResponse, ApiError>,
        now: Instant,
    ) -> Option<Todo> {
        let result = outcome.and_then(|response| client.parse_create_todo(response));
        drop(pending);
        match result {
            Ok(todo) => {
                tracing::debug!(id = %todo.id, "todo created");
                self.input.clear();
                self.message.show(Tone::Success, CREATED_MESSAGE, now);
                Some(todo)
            }
            Err(err) => {
                self.fail(&err, now);
                None
            }
        }
    }

    /// Validate, send and apply in one step.
    pub fn submit<T: Transport>(
        &mut self,
        client: &TodoClient,
        transport: &T,
        now: Instant,
    ) -> Option<Todo> {
        let pending = self.begin_submit(client, now)?;
        let outcome = send(transport, pending.request());
        self.finish_submit(client, pending, outcome, now)
    }

    fn fail(&mut self, err: &ApiError, now: Instant) {
        tracing::error!(error = %err, "error creating todo");
        self.message.show(Tone::Error, format!("Error: {err}"), now);
    }
}
