use std::sync::Arc;

use chrono::NaiveDate;
use mysql::{Column, Row, Value};

use crate::error::Result;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Convert one MySQL value.
///
/// Text-protocol results arrive as bytes; valid UTF-8 becomes text, anything else a blob.
/// Zero dates (`0000-00-00`) have no `NaiveDateTime` and are kept as text.
#[must_use]
pub fn mysql_extract_value(value: &Value) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => RowValues::Text(s.to_string()),
            Err(_) => RowValues::Blob(bytes.clone()),
        },
        Value::Int(i) => RowValues::Int(*i),
        Value::UInt(u) => {
            i64::try_from(*u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int)
        }
        Value::Float(f) => RowValues::Float(f64::from(*f)),
        Value::Double(d) => RowValues::Float(*d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|d| {
                    d.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map_or_else(
                    || {
                        RowValues::Text(format!(
                            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                        ))
                    },
                    RowValues::Timestamp,
                )
        }
        Value::Time(negative, days, hours, minutes, seconds, _micros) => {
            let sign = if *negative { "-" } else { "" };
            let total_hours = u64::from(*days) * 24 + u64::from(*hours);
            RowValues::Text(format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}"))
        }
    }
}

#[must_use]
pub fn column_names(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.name_str().into_owned()).collect()
}

/// Materialize rows from either protocol's result iterator.
///
/// # Errors
/// Returns `TablekitError::QueryError` if a row fails to decode.
pub fn build_result_set<I>(column_names: Vec<String>, rows: I) -> Result<ResultSet>
where
    I: Iterator<Item = mysql::Result<Row>>,
{
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let row = row?;
        let row_values = (0..col_count)
            .map(|idx| row.as_ref(idx).map_or(RowValues::Null, mysql_extract_value))
            .collect();
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
