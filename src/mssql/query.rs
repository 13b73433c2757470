use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures_util::TryStreamExt;
use tiberius::{ColumnData, FromSql};

use super::client::MssqlClient;
use super::params::bind_query_params;
use crate::error::{Result, TablekitError};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run a statement and materialize the rows of its result.
///
/// # Errors
/// Returns `TablekitError::QueryError` if execution or row conversion fails.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet> {
    let mut stream = bind_query_params(query, params).query(client).await?;

    let column_names: Vec<String> = stream
        .columns()
        .await?
        .map(|columns| columns.iter().map(|col| col.name().to_string()).collect())
        .unwrap_or_default();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_stream = stream.into_row_stream();
    while let Some(row) = rows_stream.try_next().await? {
        let row_values = row
            .into_iter()
            .map(|data| extract_value(&data))
            .collect::<Result<Vec<_>>>()?;
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Convert one SQL Server column value.
///
/// Dates, times, numerics and GUIDs come back as text.
///
/// # Errors
/// Returns `TablekitError::QueryError` for column types with no `RowValues` mapping.
pub fn extract_value(data: &ColumnData<'static>) -> Result<RowValues> {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I16(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I32(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I64(v) => v.map(RowValues::Int),
        ColumnData::F32(v) => v.map(|v| RowValues::Float(f64::from(v))),
        ColumnData::F64(v) => v.map(RowValues::Float),
        ColumnData::Bit(v) => v.map(RowValues::Bool),
        ColumnData::String(v) => v.as_ref().map(|s| RowValues::Text(s.to_string())),
        ColumnData::Binary(v) => v.as_ref().map(|b| RowValues::Blob(b.to_vec())),
        ColumnData::Guid(v) => v.as_ref().map(|g| RowValues::Text(g.to_string())),
        ColumnData::Numeric(v) => v.as_ref().map(|n| RowValues::Text(n.to_string())),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(data)?.map(RowValues::Timestamp)
        }
        ColumnData::DateTimeOffset(_) => {
            DateTime::<Utc>::from_sql(data)?.map(|v| RowValues::Timestamp(v.naive_utc()))
        }
        ColumnData::Date(_) => NaiveDate::from_sql(data)?
            .map(|v| RowValues::Text(v.format("%Y-%m-%d").to_string())),
        ColumnData::Time(_) => NaiveTime::from_sql(data)?
            .map(|v| RowValues::Text(v.format("%H:%M:%S%.f").to_string())),
        #[allow(unreachable_patterns)]
        other => {
            return Err(TablekitError::query_msg(format!(
                "unsupported SQL Server column value {other:?}"
            )));
        }
    };

    Ok(value.unwrap_or(RowValues::Null))
}
