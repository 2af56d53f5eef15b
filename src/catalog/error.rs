//! Catalog request errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failures from a catalog request
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never produced a response (connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The request was rejected before anything was sent
    #[error("invalid request: {0}")]
    Validation(String),
}

impl CatalogError {
    /// Network and HTTP-level failures
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Transport(_) | CatalogError::Status { .. })
    }

    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        CatalogError::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = CatalogError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "album not found".into(),
        };
        assert_eq!(err.to_string(), "server returned 404 Not Found: album not found");
        assert!(err.is_transport());
    }

    #[test]
    fn decode_error_display() {
        let err = CatalogError::decode("albums?scope=tree", "missing field `album`");
        assert_eq!(
            err.to_string(),
            "malformed response from albums?scope=tree: missing field `album`"
        );
        assert!(!err.is_transport());
    }

    #[test]
    fn validation_error_display() {
        let err = CatalogError::Validation("no paths to scan".into());
        assert_eq!(err.to_string(), "invalid request: no paths to scan");
    }
}
