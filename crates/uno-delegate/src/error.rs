//! Error types for dynamic dispatch and delegation.

use thiserror::Error;

use crate::value::UnoException;

/// Errors raised when invoking methods or reading attributes.
///
/// Decoration itself never fails; every variant surfaces at call time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DelegateError {
    #[error("'{class}' object has no method '{method}'")]
    MethodNotFound { class: String, method: String },

    #[error("'{class}' object has no attribute '{name}'")]
    AttributeNotFound { class: String, name: String },

    #[error("attribute '{name}' holds a {found}, not an object")]
    NotAnObject { name: String, found: &'static str },

    #[error("Invalid value type: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("missing argument {0}")]
    MissingArgument(usize),

    /// An exception raised by a method body.
    #[error("{0}")]
    Raised(UnoException),
}

impl DelegateError {
    /// Raise an exception of the given type from a method body.
    pub fn raise(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        DelegateError::Raised(UnoException::new(type_name, message))
    }
}

impl From<UnoException> for DelegateError {
    fn from(exc: UnoException) -> Self {
        DelegateError::Raised(exc)
    }
}

pub type Result<T> = std::result::Result<T, DelegateError>;
