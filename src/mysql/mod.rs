// MySQL backend: one blocking `mysql` connection.
//
// - params: RowValues -> binary protocol values
// - query: value extraction and result materialization

pub mod params;
pub mod query;

use mysql::prelude::Queryable;
use mysql::{Conn, Opts, OptsBuilder};

use crate::error::{Result, TablekitError};
use crate::results::ResultSet;
use crate::types::RowValues;

pub use query::{build_result_set, column_names, mysql_extract_value};

/// Open MySQL session.
pub struct MysqlHandle {
    conn: Conn,
}

impl MysqlHandle {
    /// Connect using a `mysql://host:port/db` URL, applying credentials separately.
    ///
    /// # Errors
    /// Returns `TablekitError::ConnectionError` if the URL is malformed or the login fails.
    pub fn open(url: &str, username: &str, password: &str) -> Result<Self> {
        let opts = Opts::from_url(url)
            .map_err(|e| TablekitError::connection("invalid mysql url", mysql::Error::from(e)))?;
        let opts = OptsBuilder::from_opts(opts)
            .user(Some(username))
            .pass(Some(password));
        let conn = Conn::new(opts)
            .map_err(|e| TablekitError::connection("failed to connect to mysql", e))?;
        Ok(Self { conn })
    }

    /// Prepared execution over the binary protocol so numbers keep their types.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` on prepare or execution failure.
    pub fn query(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        let mut result = self.conn.exec_iter(sql, params::convert(params))?;
        let names = column_names(result.columns().as_ref());
        build_result_set(names, result.by_ref())
    }

    /// Text-protocol execution for statements the server will not prepare (`SHOW`, `DESCRIBE`).
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` on execution failure.
    pub fn query_text(&mut self, sql: &str) -> Result<ResultSet> {
        let mut result = self.conn.query_iter(sql)?;
        let names = column_names(result.columns().as_ref());
        build_result_set(names, result.by_ref())
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` on execution failure.
    pub fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize> {
        self.conn.exec_drop(sql, params::convert(params))?;
        Ok(usize::try_from(self.conn.affected_rows()).unwrap_or(usize::MAX))
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if any statement fails.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        Ok(self.conn.query_drop(sql)?)
    }

    #[must_use]
    pub fn last_insert_id(&self) -> Option<i64> {
        match self.conn.last_insert_id() {
            0 => None,
            id => i64::try_from(id).ok(),
        }
    }

    /// Dropping the connection sends `COM_QUIT`.
    ///
    /// # Errors
    /// Infallible for this backend; kept for a uniform signature.
    #[allow(clippy::unnecessary_wraps)]
    pub fn close(self) -> Result<()> {
        drop(self.conn);
        Ok(())
    }
}
