//! SQL text for each terminal operation. Pure: nothing here touches a connection.

use std::fmt::Write;

use super::{Condition, QueryState};
use crate::dialect::Driver;
use crate::error::{Result, TablekitError};
use crate::types::{Record, RowValues};

// largest value MySQL accepts for LIMIT; it has no "no limit" keyword
const MYSQL_NO_LIMIT: u64 = u64::MAX;

/// SQL text with `?` placeholders and the values bound to them, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    pub sql: String,
    pub params: Vec<RowValues>,
}

impl RawQuery {
    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

pub(crate) fn select_sql(driver: Driver, table: &str, state: &QueryState) -> RawQuery {
    render_select(driver, table, state, true)
}

/// Like [`select_sql`] without ORDER BY; ordering cannot change an aggregate.
pub(crate) fn count_sql(driver: Driver, table: &str, state: &QueryState) -> RawQuery {
    render_select(driver, table, state, false)
}

fn render_select(driver: Driver, table: &str, state: &QueryState, with_order: bool) -> RawQuery {
    let mut sql = format!("SELECT {} FROM {table}", state.fields.join(", "));
    let mut params = Vec::with_capacity(state.conditions.len());
    push_where(&mut sql, &mut params, &state.conditions);

    let ordered = with_order && !state.order_by.is_empty();
    if ordered {
        let order = state
            .order_by
            .iter()
            .map(|(column, direction)| format!("{column} {direction}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(sql, " ORDER BY {order}");
    }
    push_pagination(&mut sql, driver, ordered, state.limit, state.offset);

    RawQuery { sql, params }
}

fn push_where(sql: &mut String, params: &mut Vec<RowValues>, conditions: &[Condition]) {
    if conditions.is_empty() {
        return;
    }
    let clauses = conditions
        .iter()
        .map(|c| format!("{} {} ?", c.column, c.operator))
        .collect::<Vec<_>>()
        .join(" AND ");
    let _ = write!(sql, " WHERE {clauses}");
    params.extend(conditions.iter().map(|c| c.value.clone()));
}

fn push_pagination(
    sql: &mut String,
    driver: Driver,
    ordered: bool,
    limit: Option<u64>,
    offset: Option<u64>,
) {
    if limit.is_none() && offset.is_none() {
        return;
    }

    if driver == Driver::Mssql {
        // OFFSET/FETCH is only legal after ORDER BY
        if !ordered {
            sql.push_str(" ORDER BY (SELECT NULL)");
        }
        let _ = write!(sql, " OFFSET {} ROWS", offset.unwrap_or(0));
        if let Some(n) = limit {
            let _ = write!(sql, " FETCH NEXT {n} ROWS ONLY");
        }
        return;
    }

    match (limit, driver) {
        (Some(n), _) => {
            let _ = write!(sql, " LIMIT {n}");
        }
        (None, Driver::Sqlite) => sql.push_str(" LIMIT -1"),
        (None, Driver::Mysql) => {
            let _ = write!(sql, " LIMIT {MYSQL_NO_LIMIT}");
        }
        (None, _) => {}
    }
    if let Some(m) = offset {
        let _ = write!(sql, " OFFSET {m}");
    }
}

/// # Errors
/// Returns `TablekitError::ValidationError` if `data` is empty.
pub(crate) fn insert_sql(table: &str, data: &Record) -> Result<RawQuery> {
    if data.is_empty() {
        return Err(TablekitError::ValidationError(format!(
            "insert into `{table}` needs at least one column value"
        )));
    }
    let columns = data.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
    let placeholders = vec!["?"; data.len()].join(", ");
    Ok(RawQuery {
        sql: format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})"),
        params: data.values().cloned().collect(),
    })
}

/// A row made entirely of column defaults, for tables where no column takes a value.
pub(crate) fn default_row_sql(driver: Driver, table: &str) -> RawQuery {
    let sql = match driver {
        Driver::Mysql => format!("INSERT INTO {table} () VALUES ()"),
        Driver::Postgres | Driver::Sqlite | Driver::Mssql => {
            format!("INSERT INTO {table} DEFAULT VALUES")
        }
    };
    RawQuery::new(sql, Vec::new())
}

/// Parameters are the SET values in record order followed by the condition values.
///
/// # Errors
/// Returns `TablekitError::SafetyError` when there are no conditions (checked first), and
/// `TablekitError::ValidationError` if `data` is empty.
pub(crate) fn update_sql(table: &str, data: &Record, conditions: &[Condition]) -> Result<RawQuery> {
    require_conditions("UPDATE", table, conditions)?;
    if data.is_empty() {
        return Err(TablekitError::ValidationError(format!(
            "update of `{table}` needs at least one column value"
        )));
    }
    let assignments = data
        .keys()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("UPDATE {table} SET {assignments}");
    let mut params: Vec<RowValues> = data.values().cloned().collect();
    push_where(&mut sql, &mut params, conditions);
    Ok(RawQuery { sql, params })
}

/// # Errors
/// Returns `TablekitError::SafetyError` when there are no conditions.
pub(crate) fn delete_sql(table: &str, conditions: &[Condition]) -> Result<RawQuery> {
    require_conditions("DELETE", table, conditions)?;
    let mut sql = format!("DELETE FROM {table}");
    let mut params = Vec::with_capacity(conditions.len());
    push_where(&mut sql, &mut params, conditions);
    Ok(RawQuery { sql, params })
}

fn require_conditions(verb: &str, table: &str, conditions: &[Condition]) -> Result<()> {
    if conditions.is_empty() {
        tracing::warn!(table, statement = verb, "refusing unconditioned statement");
        return Err(TablekitError::SafetyError(format!(
            "{verb} on `{table}` without a WHERE condition is not allowed"
        )));
    }
    Ok(())
}
