//! Canned transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays queued outcomes in order and records every request it sees.
/// Panics if a request arrives with nothing queued.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    seen: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.outcomes
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, reason: &str) -> Self {
        self.outcomes
            .borrow_mut()
            .push_back(Err(ApiError::Network(reason.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.borrow_mut().push(request.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method.as_str(), request.path))
    }
}
