use rusqlite::types::Value;

use crate::types::RowValues;

/// Convert one bound value into its `SQLite` storage class.
///
/// `SQLite` has no boolean or timestamp type: booleans bind as 0/1 and timestamps as
/// ISO-8601 text so they sort and compare correctly.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Positional parameters ready for rusqlite.
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        Params(params.iter().map(row_value_to_sqlite_value).collect())
    }

    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}
