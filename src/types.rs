use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::{Result, TablekitError};

/// Values that can be stored in a database row or bound as statement parameters.
///
/// One enum serves every backend so builder code never branches on driver types:
/// ```rust
/// use sql_tablekit::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::from("alice"),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(value) => Some(*value),
            RowValues::Int(1) => Some(true),
            RowValues::Int(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            RowValues::Timestamp(value) => Some(*value),
            RowValues::Text(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                .ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Lenient integer coercion across the shapes drivers use for aggregates.
    ///
    /// MySQL and SQL Server may hand back `COUNT(*)` as text or decimal depending on protocol.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RowValues::Int(i) => Some(*i),
            RowValues::Bool(b) => Some(i64::from(*b)),
            #[allow(clippy::cast_possible_truncation)]
            RowValues::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            RowValues::Text(s) => s.trim().parse().ok(),
            RowValues::JSON(v) => v.as_i64(),
            _ => None,
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<u32> for RowValues {
    fn from(value: u32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Scalars map onto their natural variant; arrays and objects are kept as JSON.
impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => RowValues::Null,
            JsonValue::Bool(b) => RowValues::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => RowValues::Int(i),
                None => n.as_f64().map_or(RowValues::Null, RowValues::Float),
            },
            JsonValue::String(s) => RowValues::Text(s),
            other @ (JsonValue::Array(_) | JsonValue::Object(_)) => RowValues::JSON(other),
        }
    }
}

impl Serialize for RowValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RowValues::Int(i) => serializer.serialize_i64(*i),
            RowValues::Float(f) => serializer.serialize_f64(*f),
            RowValues::Text(s) => serializer.serialize_str(s),
            RowValues::Bool(b) => serializer.serialize_bool(*b),
            RowValues::Timestamp(dt) => {
                serializer.collect_str(&dt.format("%Y-%m-%d %H:%M:%S%.f"))
            }
            RowValues::Null => serializer.serialize_none(),
            RowValues::JSON(v) => v.serialize(serializer),
            RowValues::Blob(bytes) => serializer.collect_seq(bytes),
        }
    }
}

/// Column-to-value payload for INSERT and UPDATE, kept in insertion order.
///
/// Column order in the rendered statement is exactly the iteration order of the record.
pub type Record = IndexMap<String, RowValues>;

/// Parse a JSON object payload into a [`Record`], preserving key order.
///
/// # Errors
/// Returns `TablekitError::ValidationError` if the text is not valid JSON or not an object.
pub fn record_from_json(payload: &str) -> Result<Record> {
    let value: JsonValue = serde_json::from_str(payload)
        .map_err(|e| TablekitError::ValidationError(format!("invalid JSON data: {e}")))?;
    match value {
        JsonValue::Object(map) => Ok(map
            .into_iter()
            .map(|(column, value)| (column, RowValues::from(value)))
            .collect()),
        other => Err(TablekitError::ValidationError(format!(
            "JSON data must be an object of column/value pairs, got {other}"
        ))),
    }
}
