// SQLite backend: a single rusqlite connection driven synchronously.
//
// - params: RowValues -> rusqlite values
// - query: row extraction and result materialization

pub mod params;
pub mod query;

use rusqlite::params_from_iter;

use crate::error::{Result, TablekitError};
use crate::results::ResultSet;
use crate::types::RowValues;

pub use params::Params;
pub use query::build_result_set;

/// Open `SQLite` database handle.
pub struct SqliteHandle {
    conn: rusqlite::Connection,
}

impl SqliteHandle {
    /// Open a file database, creating it if needed, or an in-memory one for `:memory:`.
    ///
    /// # Errors
    /// Returns `TablekitError::ConnectionError` if the file cannot be opened.
    pub fn open(path: &str) -> Result<Self> {
        let opened = if path == ":memory:" {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(path)
        };
        let conn = opened
            .map_err(|e| TablekitError::connection(format!("failed to open sqlite {path}"), e))?;
        Ok(Self { conn })
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` on prepare or execution failure.
    pub fn query(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        let converted = Params::convert(params);
        let mut stmt = self.conn.prepare(sql)?;
        build_result_set(&mut stmt, converted.as_values())
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` on prepare or execution failure.
    pub fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize> {
        let converted = Params::convert(params);
        let mut stmt = self.conn.prepare(sql)?;
        Ok(stmt.execute(params_from_iter(converted.as_values().iter()))?)
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if any statement fails.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        Ok(self.conn.execute_batch(sql)?)
    }

    /// Rowid of the most recent successful INSERT on this handle, if any.
    #[must_use]
    pub fn last_insert_id(&self) -> Option<i64> {
        match self.conn.last_insert_rowid() {
            0 => None,
            id => Some(id),
        }
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if `SQLite` refuses to close (unfinalized statements).
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| TablekitError::from(e))
    }
}
