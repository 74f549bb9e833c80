//! Error types for the todo client.
//!
//! # Design
//! Three families reach the user: `Validation` (rejected locally, no request
//! was sent), `Network` (no response was obtained) and `Server` (a response
//! with a non-success status). `Server` carries an already human-readable
//! message so components can show it without further formatting. The two
//! serde variants cover a well-formed exchange with an unusable payload.

/// Errors returned by `TodoClient` and by `Transport` implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input rejected before any request was built.
    #[error("{0}")]
    Validation(String),

    /// The transport could not complete the round trip.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A success response whose body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Status code of a `Server` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_bare_message() {
        let err = ApiError::Server {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn network_error_is_prefixed() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");
        assert_eq!(err.status(), None);
    }
}
