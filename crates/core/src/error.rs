//! Error taxonomy for cluster client operations
//!
//! Every failure surfaces as a distinguishable kind so callers can branch on
//! the variant (status-code-derived) rather than on message text.

use std::time::Duration;

use thiserror::Error;

use crate::provider::Provider;

/// Result type used across the client crates
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds for cluster client operations
#[derive(Debug, Error)]
pub enum Error {
    /// Target bucket or object does not exist at time of query
    #[error("not found: {0}")]
    NotFound(String),

    /// Creation conflict; never retried automatically
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Malformed request rejected synchronously by the client or cluster
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation is not valid for the bucket's provider
    #[error("operation '{operation}' is not supported for provider '{provider}'")]
    InvalidProvider {
        provider: Provider,
        operation: &'static str,
    },

    /// The cluster does not recognize the xaction id
    #[error("xaction not found: {0}")]
    XactionNotFound(String),

    /// A wait exceeded its wall-clock deadline without a terminal state
    #[error("timed out after {elapsed:?} waiting for xaction '{id}'")]
    Timeout { id: String, elapsed: Duration },

    /// Network or connection failure below the HTTP layer
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx cluster response that maps to no more specific kind
    #[error("cluster responded with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Local I/O failure (e.g. an unreadable upload source)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unloadable client configuration
    #[error("config error: {0}")]
    Config(String),

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

impl Error {
    /// Map a non-2xx HTTP status to an error kind.
    ///
    /// `message` is the cluster-reported detail when the response carried
    /// one, otherwise whatever context the call site has.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            409 => Self::AlreadyExists(message),
            400 => Self::InvalidArgument(message),
            _ => Self::Api { status, message },
        }
    }

    /// Whether the error is transient and worth retrying inside a polling
    /// loop. Only transport-class failures qualify; logical outcomes such as
    /// `NotFound` never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Whether the error reports an absent target (bucket, object, xaction)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::XactionNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            Error::from_status(404, "no such bucket"),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from_status(409, "bucket exists"),
            Error::AlreadyExists(_)
        ));
        assert!(matches!(
            Error::from_status(400, "bad rename target"),
            Error::InvalidArgument(_)
        ));
        match Error::from_status(500, "boom") {
            Error::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Transport("connection reset".into()).is_retryable());
        assert!(Error::from_status(503, "unavailable").is_retryable());
        assert!(Error::from_status(429, "slow down").is_retryable());
        assert!(!Error::from_status(500, "internal").is_retryable());
        assert!(!Error::NotFound("gone".into()).is_retryable());
        assert!(!Error::AlreadyExists("dup".into()).is_retryable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound("b".into()).is_not_found());
        assert!(Error::XactionNotFound("x1".into()).is_not_found());
        assert!(!Error::Transport("down".into()).is_not_found());
    }

    #[test]
    fn test_invalid_provider_message() {
        let err = Error::InvalidProvider {
            provider: Provider::Ais,
            operation: "evict",
        };
        let msg = err.to_string();
        assert!(msg.contains("evict"));
        assert!(msg.contains("ais"));
    }
}
