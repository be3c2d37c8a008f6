//! Error types for mailgraph.

use alloc::string::String;
use core::fmt;

/// Result type alias for mailgraph operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for record input and configuration.
///
/// The diff pipeline itself never produces errors; these only surface at the
/// boundaries where records enter the system or a configuration is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A record line could not be decoded.
    MalformedRecord {
        line: usize,
        message: String,
    },
    /// A configuration value is out of range.
    InvalidConfig {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedRecord { line, message } => {
                write!(f, "Malformed record on line {}: {}", line, message)
            }
            Error::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates a malformed record error.
    pub fn malformed_record(line: usize, message: impl Into<String>) -> Self {
        Error::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }
}
