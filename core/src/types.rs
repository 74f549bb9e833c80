//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the backend schema but are defined independently from
//! the mock-server crate; the integration tests catch schema drift. Ids are
//! opaque to the client: backends that issue integers and backends that issue
//! UUID strings both decode into the same `TodoId`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned todo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => TodoId(s),
            RawId::Signed(n) => TodoId(n.to_string()),
            RawId::Unsigned(n) => TodoId(n.to_string()),
        })
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub body: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub body: String,
    #[serde(default)]
    pub completed: bool,
}

impl CreateTodo {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            completed: false,
        }
    }
}

/// Error payload returned by the backend on non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
