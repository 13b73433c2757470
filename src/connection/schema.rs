use serde_json::{Value, json};

use super::Connection;
use crate::dialect::ColumnInfo;
use crate::error::{Result, TablekitError};
use crate::results::ResultSet;

impl Connection {
    /// Names of the tables in the current database, in name order.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if the enumeration statement fails.
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        let sql = self.driver.list_tables_sql();
        let rows = self.introspect(sql, &[])?;
        Ok(rows
            .column(0)
            .into_iter()
            .filter_map(|v| v.as_text().map(str::to_string))
            .collect())
    }

    /// Raw column metadata for `table`.
    ///
    /// The row shape depends on the driver (see [`Driver::describe_columns_sql`]); use
    /// [`Connection::columns`] for a uniform view.
    ///
    /// [`Driver::describe_columns_sql`]: crate::dialect::Driver::describe_columns_sql
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if the statement fails.
    pub fn describe_columns(&mut self, table: &str) -> Result<ResultSet> {
        let (sql, params) = self.driver.describe_columns_sql(table);
        self.introspect(&sql, &params)
    }

    /// Column metadata normalized to [`ColumnInfo`].
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if the statement fails or a row has no column name.
    pub fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let driver = self.driver;
        self.describe_columns(table)?
            .iter()
            .map(|row| ColumnInfo::from_row(driver, row))
            .collect()
    }

    /// `{driver, database, host, tables}` for status output.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if the tables cannot be listed.
    pub fn summary(&mut self) -> Result<Value> {
        let tables = self.list_tables()?;
        Ok(json!({
            "driver": self.driver,
            "database": self.config.database,
            "host": self.config.host,
            "tables": tables,
        }))
    }

    /// [`Connection::summary`] as pretty-printed JSON.
    ///
    /// # Errors
    /// Same as [`Connection::summary`].
    pub fn to_json(&mut self) -> Result<String> {
        let summary = self.summary()?;
        serde_json::to_string_pretty(&summary)
            .map_err(|e| TablekitError::query_msg(format!("failed to render summary: {e}")))
    }
}
