//! Typed values accepted by the builder.
//!
//! Every value that reaches the statement text passes through
//! [`escape_literal`](crate::escape::escape_literal) or
//! [`format_value`](crate::escape::format_value). The only ways around
//! escaping are the placeholder token (`?`), [`Value::Raw`], and text that
//! looks like a function call in the clauses that sniff for one.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// The parameter placeholder token.
pub const PLACEHOLDER: &str = "?";

/// A value to be rendered into SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Rendered as bare `true` / `false`.
    Bool(bool),
    /// Signed integer, rendered bare.
    Int(i64),
    /// Unsigned integer, rendered bare.
    UInt(u64),
    /// Floating point number, rendered bare when finite.
    Float(f64),
    /// Text, escaped and single quoted (except the placeholder token).
    Text(String),
    /// Date/time, rendered with seconds precision.
    DateTime(NaiveDateTime),
    /// Raw SQL fragment, never escaped.
    ///
    /// The caller is responsible for the safety of this text.
    Raw(String),
    /// A parenthesized list, used for membership tests.
    List(Vec<Value>),
}

impl Value {
    /// The `?` placeholder, preserved for driver-side binding.
    pub fn placeholder() -> Self {
        Self::Text(PLACEHOLDER.to_string())
    }

    /// A raw SQL fragment (e.g. `NOW()`), emitted verbatim.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Returns `true` for the placeholder token.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Text(s) if s == PLACEHOLDER)
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text of a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::UInt(u64::from(v))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

/// UTC timestamps are stored as their naive UTC wall time.
impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v.naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
