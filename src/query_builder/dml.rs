use super::TableQuery;
use super::render::{self, RawQuery};
use crate::error::Result;
use crate::types::{Record, RowValues};

fn collect_record<I, K, V>(data: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<RowValues>,
{
    data.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

impl TableQuery<'_> {
    /// # Errors
    /// Returns `TablekitError::ValidationError` if `data` is empty.
    pub fn render_insert(&self, data: &Record) -> Result<RawQuery> {
        render::insert_sql(&self.table, data)
    }

    /// # Errors
    /// Returns `TablekitError::SafetyError` without conditions, then
    /// `TablekitError::ValidationError` if `data` is empty.
    pub fn render_update(&self, data: &Record) -> Result<RawQuery> {
        render::update_sql(&self.table, data, &self.state.conditions)
    }

    /// # Errors
    /// Returns `TablekitError::SafetyError` without conditions.
    pub fn render_delete(&self) -> Result<RawQuery> {
        render::delete_sql(&self.table, &self.state.conditions)
    }

    /// Insert one row. Columns are rendered in the iteration order of `data`.
    ///
    /// Returns the affected-row count.
    ///
    /// # Errors
    /// Returns `TablekitError::ValidationError` if `data` is empty and
    /// `TablekitError::QueryError` if execution fails.
    pub fn insert<I, K, V>(&mut self, data: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        let query = self.render_insert(&collect_record(data))?;
        self.conn.execute_dml(&query.sql, &query.params)
    }

    /// Update the rows matching the current conditions.
    ///
    /// Refuses to run, sending no SQL, when no condition has been added.
    ///
    /// # Errors
    /// Returns `TablekitError::SafetyError`, `TablekitError::ValidationError`, or
    /// `TablekitError::QueryError`.
    pub fn update<I, K, V>(&mut self, data: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        let query = self.render_update(&collect_record(data))?;
        self.conn.execute_dml(&query.sql, &query.params)
    }

    /// Delete the rows matching the current conditions.
    ///
    /// Refuses to run, sending no SQL, when no condition has been added.
    ///
    /// # Errors
    /// Returns `TablekitError::SafetyError` or `TablekitError::QueryError`.
    pub fn delete(&mut self) -> Result<usize> {
        let query = self.render_delete()?;
        self.conn.execute_dml(&query.sql, &query.params)
    }
}
