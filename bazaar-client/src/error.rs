//! Client error types

use shared::StoreError;
use shared::error::AppError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never produced a response (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with an error envelope
    #[error("API error ({status}): {error}")]
    Api { status: u16, error: AppError },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing or malformed client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the service rejected the request itself (4xx)
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if (400..500).contains(status))
    }
}

/// Business rejections keep their error code; everything else means the
/// service could not be reached or understood.
impl From<ClientError> for StoreError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Api { status, error } if (400..500).contains(&status) => {
                StoreError::Rejected(error)
            }
            other => StoreError::transport(other),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_rejection_keeps_error_code() {
        let err = ClientError::Api {
            status: 409,
            error: AppError::new(ErrorCode::AttributeNameExists),
        };
        assert!(err.is_rejection());
        match StoreError::from(err) {
            StoreError::Rejected(app) => assert_eq!(app.code, ErrorCode::AttributeNameExists),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_server_errors_are_transport() {
        let err = ClientError::Api {
            status: 503,
            error: AppError::new(ErrorCode::NetworkError),
        };
        assert!(!err.is_rejection());
        assert!(matches!(StoreError::from(err), StoreError::Transport(_)));

        let err = ClientError::InvalidResponse("not json".into());
        assert!(matches!(StoreError::from(err), StoreError::Transport(_)));
    }
}
