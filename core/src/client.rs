//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each of the four operations is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the one-shot methods (`list`, `create`, ...) glue the two
//! together through a caller-supplied `Transport`.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{CreateTodo, ErrorBody, Todo, TodoId};

/// Characters escaped when an id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const EMPTY_BODY_MESSAGE: &str = "Todo cannot be empty";

const LIST_FAILED: &str = "Failed to fetch todos";
const CREATE_FAILED: &str = "Failed to add todo";
const COMPLETE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Rejects blank input with `ApiError::Validation`; the trimmed text is sent.
    pub fn build_create_todo(&self, body: &str) -> Result<HttpRequest, ApiError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ApiError::Validation(EMPTY_BODY_MESSAGE.to_string()));
        }
        let payload = serde_json::to_string(&CreateTodo::new(body))
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/todos/create", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(payload),
        })
    }

    pub fn build_complete_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/api/todos/update/{}", self.base_url, encode_id(id)),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/todos/delete/{}", self.base_url, encode_id(id)),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, LIST_FAILED)?;
        let todos: Option<Vec<Todo>> = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(todos.unwrap_or_default())
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, CREATE_FAILED)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// The acknowledgment body is ignored.
    pub fn parse_complete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, COMPLETE_FAILED)
    }

    /// The acknowledgment body is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, DELETE_FAILED)
    }

    pub fn list<T: Transport>(&self, transport: &T) -> Result<Vec<Todo>, ApiError> {
        let response = send(transport, &self.build_list_todos())?;
        self.parse_list_todos(response)
    }

    pub fn create<T: Transport>(&self, transport: &T, body: &str) -> Result<Todo, ApiError> {
        let request = self.build_create_todo(body)?;
        let response = send(transport, &request)?;
        self.parse_create_todo(response)
    }

    pub fn complete<T: Transport>(&self, transport: &T, id: &TodoId) -> Result<(), ApiError> {
        let response = send(transport, &self.build_complete_todo(id))?;
        self.parse_complete_todo(response)
    }

    pub fn delete<T: Transport>(&self, transport: &T, id: &TodoId) -> Result<(), ApiError> {
        let response = send(transport, &self.build_delete_todo(id))?;
        self.parse_delete_todo(response)
    }
}

fn encode_id(id: &TodoId) -> String {
    utf8_percent_encode(id.as_str(), PATH_SEGMENT).to_string()
}

pub(crate) fn send<T: Transport>(
    transport: &T,
    request: &HttpRequest,
) -> Result<HttpResponse, ApiError> {
    tracing::debug!(method = request.method.as_str(), path = %request.path, "sending request");
    let response = transport.execute(request)?;
    tracing::debug!(status = response.status, "received response");
    Ok(response)
}

/// Map a non-success status to `ApiError::Server` with a readable message.
///
/// The message is the body's `error` field when present, `fallback` when the
/// body is JSON without one, and `HTTP <status> : <reason>` when the body is
/// not JSON at all.
fn check_status(response: &HttpResponse, fallback: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(ErrorBody { error: Some(msg) }) if !msg.trim().is_empty() => msg,
        Ok(_) => fallback.to_string(),
        Err(_) => format!("HTTP {} : {}", response.status, response.status_text()),
    };
    Err(ApiError::Server {
        status: response.status,
        message,
    })
}
