//! Headless client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and models the UI on top of
//! them: a creation form, per-todo rows, a list container and the root shell
//! that owns the collection. Front ends render these view-models and supply
//! a `Transport`.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Every operation is split into `build_*` / `parse_*`, and every UI action
//!   into `begin_*` / `finish_*`, so an asynchronous host can keep other
//!   controls live while a request is outstanding. One-shot helpers run both
//!   halves through a `Transport`.
//! - Busy flags are scoped guards; transient messages take the current
//!   `Instant` from the caller.

pub mod app;
pub mod busy;
pub mod client;
pub mod collection;
pub mod error;
pub mod form;
pub mod http;
pub mod list;
pub mod message;
pub mod row;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use app::TodoApp;
pub use client::TodoClient;
pub use collection::{Counts, Insertion, TodoCollection};
pub use error::ApiError;
pub use form::{FormState, TodoForm};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use list::{ListStatus, ListView, TodoList};
pub use message::{Tone, TransientMessage};
pub use row::{RowEvent, TodoRow};
pub use types::{CreateTodo, Todo, TodoId};
