//! Values passed to and returned from dynamically dispatched methods.
//!
//! The variants follow the UNO type classes that show up in office
//! automation (long, hyper, double, string, sequence, interface); an
//! interface reference is an [`Object`] of this crate's object model.

use std::fmt;

use crate::object::Object;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UnoValue {
    #[default]
    Void,
    Bool(bool),
    Long(i32),
    Hyper(i64),
    Double(f64),
    String(String),
    Sequence(Vec<UnoValue>),
    /// A reference to an object; equality is identity.
    Object(Object),
}

impl UnoValue {
    pub fn is_void(&self) -> bool {
        matches!(self, UnoValue::Void)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UnoValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i32> {
        match self {
            UnoValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer view of `Long` and `Hyper` values.
    pub fn as_hyper(&self) -> Option<i64> {
        match self {
            UnoValue::Long(n) => Some(i64::from(*n)),
            UnoValue::Hyper(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of any integer or floating point value.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            UnoValue::Long(n) => Some(f64::from(*n)),
            UnoValue::Hyper(n) => Some(*n as f64),
            UnoValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            UnoValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            UnoValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Name of the variant, used in type mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            UnoValue::Void => "void",
            UnoValue::Bool(_) => "boolean",
            UnoValue::Long(_) => "long",
            UnoValue::Hyper(_) => "hyper",
            UnoValue::Double(_) => "double",
            UnoValue::String(_) => "string",
            UnoValue::Sequence(_) => "sequence",
            UnoValue::Object(_) => "object",
        }
    }
}

impl fmt::Display for UnoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnoValue::Void => write!(f, "void"),
            UnoValue::Bool(b) => write!(f, "{b}"),
            UnoValue::Long(n) => write!(f, "{n}"),
            UnoValue::Hyper(n) => write!(f, "{n}"),
            UnoValue::Double(d) => write!(f, "{d}"),
            UnoValue::String(s) => write!(f, "{s:?}"),
            UnoValue::Sequence(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            UnoValue::Object(obj) => write!(f, "<{} object>", obj.class().name()),
        }
    }
}

impl From<bool> for UnoValue {
    fn from(b: bool) -> Self {
        UnoValue::Bool(b)
    }
}

impl From<i32> for UnoValue {
    fn from(n: i32) -> Self {
        UnoValue::Long(n)
    }
}

impl From<i64> for UnoValue {
    fn from(n: i64) -> Self {
        UnoValue::Hyper(n)
    }
}

impl From<f64> for UnoValue {
    fn from(d: f64) -> Self {
        UnoValue::Double(d)
    }
}

impl From<&str> for UnoValue {
    fn from(s: &str) -> Self {
        UnoValue::String(s.to_string())
    }
}

impl From<String> for UnoValue {
    fn from(s: String) -> Self {
        UnoValue::String(s)
    }
}

impl From<Object> for UnoValue {
    fn from(obj: Object) -> Self {
        UnoValue::Object(obj)
    }
}

impl<T: Into<UnoValue>> From<Vec<T>> for UnoValue {
    fn from(items: Vec<T>) -> Self {
        UnoValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// An exception raised by a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnoException {
    /// Fully-qualified exception type name.
    pub type_name: String,
    pub message: String,
}

impl UnoException {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for UnoException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.type_name)
        } else {
            write!(f, "{}: {}", self.type_name, self.message)
        }
    }
}

impl std::error::Error for UnoException {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_views() {
        assert_eq!(UnoValue::Long(-3).as_hyper(), Some(-3));
        assert_eq!(UnoValue::Hyper(7).as_double(), Some(7.0));
        assert_eq!(UnoValue::from("x").as_hyper(), None);
    }

    #[test]
    fn test_display() {
        let seq = UnoValue::from(vec![1, 2]);
        assert_eq!(seq.to_string(), "(1, 2)");
        assert_eq!(UnoValue::from("a").to_string(), "\"a\"");
    }

    #[test]
    fn test_exception_display() {
        let exc = UnoException::new("com.sun.star.lang.IllegalArgumentException", "bad");
        assert_eq!(exc.to_string(), "com.sun.star.lang.IllegalArgumentException: bad");
    }
}
