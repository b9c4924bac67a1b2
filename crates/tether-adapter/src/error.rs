//! Adapter error types

use std::time::Duration;

use crate::job::JobKey;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("{kind} {key} not found")]
    NotFound { kind: String, key: JobKey },

    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: String, key: JobKey },

    #[error("conflict writing {kind} {key}: {message}")]
    Conflict {
        kind: String,
        key: JobKey,
        message: String,
    },

    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("{operation} on {key} cancelled")]
    Cancelled {
        operation: &'static str,
        key: String,
    },

    #[error("{operation} on {key} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        key: String,
        after: Duration,
    },

    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdapterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the outer reconciler should requeue the key.
    ///
    /// Races (`AlreadyExists`, `Conflict`) and transport failures resolve on a
    /// later attempt; a binding fed the wrong kind never does.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotFound { .. } => false,
            Self::AlreadyExists { .. } | Self::Conflict { .. } => true,
            Self::TypeMismatch { .. } => false,
            Self::Cancelled { .. } => false,
            Self::Timeout { .. } => true,
            Self::Kube(source) => {
                !matches!(source, kube::Error::Api(ae) if (400..500).contains(&ae.code))
            }
            Self::Backend(_) => true,
            Self::Serialization(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> JobKey {
        JobKey::new("ns", "paddlejob1")
    }

    #[test]
    fn messages_name_kind_and_key() {
        let err = AdapterError::NotFound {
            kind: "PaddleJob".to_string(),
            key: key(),
        };
        assert_eq!(err.to_string(), "PaddleJob ns/paddlejob1 not found");
        assert!(err.is_not_found());

        let err = AdapterError::Conflict {
            kind: "PaddleJob".to_string(),
            key: key(),
            message: "the object has been modified".to_string(),
        };
        assert!(err.to_string().contains("conflict writing PaddleJob ns/paddlejob1"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn retryability() {
        assert!(AdapterError::AlreadyExists {
            kind: "PaddleJob".to_string(),
            key: key(),
        }
        .is_retryable());
        assert!(!AdapterError::TypeMismatch {
            expected: "kubeflow.org/v1/PaddleJob".to_string(),
            found: "batch/v1/Job".to_string(),
        }
        .is_retryable());
        assert!(AdapterError::Timeout {
            operation: "get",
            key: key().to_string(),
            after: Duration::from_secs(1),
        }
        .is_retryable());
        assert!(!AdapterError::Cancelled {
            operation: "get",
            key: key().to_string(),
        }
        .is_retryable());
        assert!(AdapterError::Backend("connection reset".to_string()).is_retryable());
    }

    #[test]
    fn kube_client_errors_are_not_retryable() {
        let forbidden = kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "forbidden".to_string(),
            reason: "Forbidden".to_string(),
            code: 403,
        });
        assert!(!AdapterError::from(forbidden).is_retryable());
    }
}
