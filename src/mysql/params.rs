use chrono::{Datelike, Timelike};
use mysql::{Params as MyParams, Value};

use crate::types::RowValues;

/// Convert one bound value for the binary protocol.
///
/// MySQL has no boolean type on the wire; booleans travel as 0/1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn row_value_to_mysql_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Date(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond() / 1_000,
        ),
        RowValues::Null => Value::NULL,
        RowValues::JSON(jsval) => Value::Bytes(jsval.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    }
}

/// Positional parameters for `exec_*` calls.
#[must_use]
pub fn convert(params: &[RowValues]) -> MyParams {
    if params.is_empty() {
        MyParams::Empty
    } else {
        MyParams::Positional(params.iter().map(row_value_to_mysql_value).collect())
    }
}
