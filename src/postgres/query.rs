use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio_postgres::Statement;

use crate::error::{Result, TablekitError};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// Dates, times and numerics come back as text so no precision is lost.
///
/// # Errors
/// Returns `TablekitError::QueryError` if the column cannot be decoded or has a type with no
/// `RowValues` mapping.
pub fn postgres_extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<RowValues> {
    let type_info = row.columns()[idx].type_();

    let value = match type_info.name() {
        "int2" => row
            .try_get::<_, Option<i16>>(idx)?
            .map(|v| RowValues::Int(i64::from(v))),
        "int4" => row
            .try_get::<_, Option<i32>>(idx)?
            .map(|v| RowValues::Int(i64::from(v))),
        "int8" => row.try_get::<_, Option<i64>>(idx)?.map(RowValues::Int),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| RowValues::Float(f64::from(v))),
        "float8" => row.try_get::<_, Option<f64>>(idx)?.map(RowValues::Float),
        "numeric" => row
            .try_get::<_, Option<Decimal>>(idx)?
            .map(|v| RowValues::Text(v.to_string())),
        "bool" => row.try_get::<_, Option<bool>>(idx)?.map(RowValues::Bool),
        "timestamp" => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(RowValues::Timestamp),
        "timestamptz" => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|v| RowValues::Timestamp(v.naive_utc())),
        "date" => row
            .try_get::<_, Option<NaiveDate>>(idx)?
            .map(|v| RowValues::Text(v.format("%Y-%m-%d").to_string())),
        "time" => row
            .try_get::<_, Option<NaiveTime>>(idx)?
            .map(|v| RowValues::Text(v.format("%H:%M:%S%.f").to_string())),
        "json" | "jsonb" => row.try_get::<_, Option<Value>>(idx)?.map(RowValues::JSON),
        "bytea" => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(RowValues::Blob),
        "text" | "varchar" | "bpchar" | "name" | "unknown" => {
            row.try_get::<_, Option<String>>(idx)?.map(RowValues::Text)
        }
        other => {
            return Err(TablekitError::query_msg(format!(
                "unsupported postgres column type `{other}` for column `{}`",
                row.columns()[idx].name()
            )));
        }
    };

    Ok(value.unwrap_or(RowValues::Null))
}

/// Build a result set using statement metadata for column names, so zero-row results still
/// carry their columns.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set_from_statement(
    stmt: &Statement,
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
