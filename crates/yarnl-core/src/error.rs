//! Error types for the Yarnl shell.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Yarnl shell.
///
/// Transport failures of the optional network steps are folded into typed
/// outcomes before they reach a caller; this enum is what remains for storage,
/// page protocol and user-facing validation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum YarnlError {
    /// User input rejected before any I/O happened. The message is shown as-is.
    #[error("{0}")]
    Validation(String),

    /// A server or page answered with something we could not interpret
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Preference or cookie storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// A navigation left the hosted page and nothing on the platform could take it
    #[error("Unhandled navigation to {url}: {reason}")]
    UnhandledNavigation { url: String, reason: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl YarnlError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an UnhandledNavigation error
    pub fn unhandled_navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnhandledNavigation {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the text suitable for showing next to the input that caused it.
    ///
    /// Validation messages are already phrased for the user; everything else
    /// gets the full display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for YarnlError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for YarnlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for YarnlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for YarnlError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for YarnlError {
    fn from(err: url::ParseError) -> Self {
        Self::Validation(format!("Malformed URL: {}", err))
    }
}

/// A type alias for `Result<T, YarnlError>`.
pub type Result<T> = std::result::Result<T, YarnlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_user_facing() {
        let err = YarnlError::validation("Please enter a valid URL");
        assert_eq!(err.to_string(), "Please enter a valid URL");
        assert_eq!(err.user_message(), "Please enter a valid URL");
    }

    #[test]
    fn test_other_errors_keep_their_prefix() {
        let err = YarnlError::storage("disk full");
        assert_eq!(err.user_message(), "Storage error: disk full");
        let err = YarnlError::unhandled_navigation("market://x", "no handler");
        assert_eq!(err.user_message(), "Unhandled navigation to market://x: no handler");
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: YarnlError = io.into();
        match err {
            YarnlError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
