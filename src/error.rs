//! Error types for telepoll
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// HTTP status the remote source answers with when another consumer is polling
pub const CONFLICT_STATUS: u16 = 409;

/// All error types that can occur while polling
#[derive(Debug, Error)]
pub enum PollerError {
    /// Non-2xx answer from the remote source
    #[error("API error {status}: {description}")]
    Api { status: u16, description: String },

    /// Transport-level failure (connect, TLS, reset)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 2xx answer whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration rejected before the loop starts
    #[error("Config error: {0}")]
    Config(String),

    /// Background poll task panicked or was aborted
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PollerError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PollerError::Api { status, .. } => Some(*status),
            PollerError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Another consumer took over polling with the same credential
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(CONFLICT_STATUS)
    }
}

/// Result type alias for telepoll operations
pub type Result<T> = std::result::Result<T, PollerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = PollerError::Api {
            status: 409,
            description: "Conflict: terminated by other getUpdates request".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error 409: Conflict: terminated by other getUpdates request"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = PollerError::Config("limit must be between 1 and 100".to_string());
        assert_eq!(err.to_string(), "Config error: limit must be between 1 and 100");
    }

    #[test]
    fn test_is_conflict() {
        let conflict = PollerError::Api {
            status: 409,
            description: String::new(),
        };
        assert!(conflict.is_conflict());
        assert_eq!(conflict.status(), Some(409));

        let unauthorized = PollerError::Api {
            status: 401,
            description: "Unauthorized".to_string(),
        };
        assert!(!unauthorized.is_conflict());

        assert!(!PollerError::InvalidResponse("bad".to_string()).is_conflict());
        assert_eq!(PollerError::Config("x".to_string()).status(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: PollerError = io_err.into();
        assert!(matches!(err, PollerError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<u32>("not a number").unwrap_err();
        let err: PollerError = yaml_err.into();
        assert!(matches!(err, PollerError::Yaml(_)));
    }
}
