//! Runtime field values and their SQL literal form.
//!
//! Literal rendering is a function of the value's kind alone: integers are
//! written bare, everything else is wrapped in single quotes. Embedded quote
//! characters are NOT escaped; values are spliced into statement text as-is.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A field value read from an instance or a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Any integer field (`i8` through `i64`, `u8` through `u32`).
    Integer(i64),
    /// Floating point value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Boolean value.
    Boolean(bool),
    /// Date and time without zone.
    Timestamp(NaiveDateTime),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Renders the value as a SQL literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablemap_core::Value;
    ///
    /// assert_eq!(Value::from(42).to_sql_literal(), "42");
    /// assert_eq!(Value::from("hello").to_sql_literal(), "'hello'");
    /// assert_eq!(Value::from(2.5).to_sql_literal(), "'2.5'");
    /// assert_eq!(Value::Null.to_sql_literal(), "NULL");
    /// ```
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => format!("'{r}'"),
            Value::Text(s) => format!("'{s}'"),
            Value::Boolean(b) => format!("'{b}'"),
            Value::Timestamp(ts) => format!("'{}'", ts.format(TIMESTAMP_FORMAT)),
            Value::Blob(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 3);
                out.push_str("X'");
                for b in bytes {
                    let _ = write!(out, "{b:02X}");
                }
                out.push('\'');
                out
            }
        }
    }

    /// Short name of the value's kind, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Blob(_) => "blob",
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! integer_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

integer_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a stored [`Value`] back into a Rust field type.
///
/// Returns `None` when the value's kind does not fit; callers turn that into
/// a [`RowError::TypeMismatch`](crate::RowError::TypeMismatch).
pub trait FromValue: Sized {
    /// Name of the target type for error messages.
    const EXPECTED: &'static str;

    /// Converts the value, or returns `None` if the kind does not fit.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => i32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "real";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Real(r) => Some(r),
            Value::Integer(i) => Some(i as f64),
            // Real fields are written quoted, so SQLite may hand them back as text.
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            Value::Integer(i) => Some(i != 0),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for NaiveDateTime {
    const EXPECTED: &'static str = "timestamp";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(ts) => Some(ts),
            Value::Text(s) => NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).ok(),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "blob";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}
