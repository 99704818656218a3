//! Error types for the adapters and the office runner.

use thiserror::Error;
use uno_delegate::UnoException;

/// Errors from container and date adapters.
#[derive(Debug, Error, PartialEq)]
pub enum AdapterError {
    #[error("Index {0} out of range")]
    IndexOutOfRange(usize),

    #[error("No element named '{0}'")]
    KeyNotFound(String),

    #[error("Bad uno container type: {0:?}")]
    BadContainerType(Vec<String>),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("UNO exception: {0}")]
    Uno(#[from] UnoException),
}

pub type Result<T> = std::result::Result<T, AdapterError>;

/// Failure to attach to a running office process.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Nothing is listening at the URL yet.
    #[error("No office listening at {0}")]
    NoConnect(String),

    #[error("UNO exception: {0}")]
    Uno(#[from] UnoException),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from starting, connecting to or stopping an office process.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to connect to office on port {0}")]
    ConnectFailed(u16),

    #[error("Failed to start office on port {port}: {source}")]
    SpawnFailed {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Office not found. Install LibreOffice and ensure 'soffice' is in PATH.")]
    NotFound,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("UNO exception: {0}")]
    Uno(#[from] UnoException),
}
