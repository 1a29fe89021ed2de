//! Error types and handling for CEZ HDO
//!
//! Fatal failures of a schedule fetch are a closed set of variants here. They
//! never cross the client boundary: `ScheduleClient::get_data` turns every one
//! of them into the fail-safe error state.

use thiserror::Error;

/// Result type alias for CEZ HDO operations
pub type Result<T> = std::result::Result<T, HdoError>;

/// Main error type for CEZ HDO
#[derive(Debug, Error)]
pub enum HdoError {
    /// Non-200 status or connection failure talking to the provider
    #[error("Network error: {message}")]
    Transport { message: String },

    /// Request exceeded the total timeout
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// Response body was not the expected JSON
    #[error("JSON decode error: {message}")]
    Decode { message: String },

    /// Requested signal has no record for today
    #[error("Signal '{signal}' not found in API response")]
    SignalNotFound { signal: String },

    /// Today's record exists but carries no range string
    #[error("No schedule data for signal '{signal}'")]
    ScheduleEmpty { signal: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl HdoError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        HdoError::Transport {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        HdoError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        HdoError::Decode {
            message: message.into(),
        }
    }

    pub fn signal_not_found<S: Into<String>>(signal: S) -> Self {
        HdoError::SignalNotFound {
            signal: signal.into(),
        }
    }

    pub fn schedule_empty<S: Into<String>>(signal: S) -> Self {
        HdoError::ScheduleEmpty {
            signal: signal.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        HdoError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        HdoError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        HdoError::Io {
            message: message.into(),
        }
    }

    /// Whether this error came from the network layer rather than the payload
    pub fn is_transport(&self) -> bool {
        matches!(self, HdoError::Transport { .. } | HdoError::Timeout { .. })
    }
}

impl From<std::io::Error> for HdoError {
    fn from(err: std::io::Error) -> Self {
        HdoError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for HdoError {
    fn from(err: serde_yaml::Error) -> Self {
        HdoError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HdoError {
    fn from(err: serde_json::Error) -> Self {
        HdoError::decode(err.to_string())
    }
}

impl From<reqwest::Error> for HdoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HdoError::timeout(err.to_string())
        } else if err.is_decode() {
            HdoError::decode(err.to_string())
        } else {
            HdoError::transport(err.to_string())
        }
    }
}
