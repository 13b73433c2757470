use super::TableQuery;
use super::render::{self, RawQuery};
use crate::error::{Result, TablekitError};
use crate::results::{ResultSet, Row};

impl TableQuery<'_> {
    /// Render the current SELECT without executing it.
    #[must_use]
    pub fn render_select(&self) -> RawQuery {
        render::select_sql(self.conn.driver(), &self.table, &self.state)
    }

    /// Fetch every matching row; empty when nothing matches.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if execution fails.
    pub fn get(&mut self) -> Result<ResultSet> {
        let query = self.render_select();
        self.conn.execute(&query.sql, &query.params)
    }

    /// Fetch the first matching row. Leaves `LIMIT 1` on the builder.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if execution fails.
    pub fn first(&mut self) -> Result<Option<Row>> {
        self.limit(1);
        Ok(self.get()?.into_iter().next())
    }

    /// Number of rows matching the current conditions.
    ///
    /// Replaces the projection with `COUNT(*) as count` and sets `LIMIT 1` on the builder.
    /// ORDER BY is not rendered. A missing or non-numeric count reads as 0.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if execution fails.
    pub fn count(&mut self) -> Result<i64> {
        self.select(["COUNT(*) as count"]);
        self.limit(1);
        let query = render::count_sql(self.conn.driver(), &self.table, &self.state);
        let rows = self.conn.execute(&query.sql, &query.params)?;
        Ok(rows
            .first()
            .and_then(|row| row.get_ignore_case("count").or_else(|| row.get_by_index(0)))
            .and_then(|value| value.as_integer())
            .unwrap_or(0))
    }

    /// Raw column metadata of the bound table; see [`crate::Connection::describe_columns`].
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if introspection fails.
    pub fn describe(&mut self) -> Result<ResultSet> {
        self.conn.describe_columns(&self.table)
    }

    /// [`TableQuery::get`] as a pretty-printed JSON array of objects.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if execution or serialization fails.
    pub fn to_json(&mut self) -> Result<String> {
        let rows = self.get()?;
        serde_json::to_string_pretty(&rows)
            .map_err(|e| TablekitError::query_msg(format!("failed to render rows as JSON: {e}")))
    }
}
