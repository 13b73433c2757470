//! The single database handle a command works through.
//!
//! A [`Connection`] validates its [`ConnectionConfig`] before any I/O, opens exactly one
//! backend handle, and executes statements synchronously. It is not shared between threads
//! by this crate; callers that need that must serialize access themselves.

pub(crate) mod backend;
mod schema;
mod tx;

use crate::config::ConnectionConfig;
use crate::dialect::Driver;
use crate::error::Result;
use crate::query_builder::TableQuery;
use crate::results::{ResultSet, Row};
use crate::translation::translate_placeholders;
use crate::types::RowValues;

use backend::Backend;

/// One open database handle plus the config it was opened with.
pub struct Connection {
    driver: Driver,
    config: ConnectionConfig,
    backend: Backend,
}

impl Connection {
    /// Validate `config` and open the handle.
    ///
    /// Validation runs first; an unknown driver or a missing required field fails without
    /// touching the network.
    ///
    /// # Errors
    /// Returns `TablekitError::ConfigError` for bad config and `TablekitError::ConnectionError`
    /// if the handle cannot be opened.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let driver = config.validate()?;
        let backend = Backend::open(driver, &config)?;
        tracing::info!(
            driver = %driver,
            host = config.host.as_deref().unwrap_or_default(),
            database = config.database.as_deref().unwrap_or_default(),
            "database connection opened"
        );
        Ok(Self {
            driver,
            config,
            backend,
        })
    }

    #[must_use]
    pub fn driver(&self) -> Driver {
        self.driver
    }

    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Run a statement with `?` placeholders and return every row.
    ///
    /// Zero matching rows give an empty [`ResultSet`].
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` wrapping the driver error.
    pub fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        let sql = translate_placeholders(sql, self.driver.placeholder_style());
        tracing::debug!(driver = %self.driver, sql = %sql, params = params.len(), "query");
        self.backend.query(&sql, params)
    }

    /// Run an INSERT, UPDATE, or DELETE and return the affected-row count.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` wrapping the driver error.
    pub fn execute_dml(&mut self, sql: &str, params: &[RowValues]) -> Result<usize> {
        let sql = translate_placeholders(sql, self.driver.placeholder_style());
        tracing::debug!(driver = %self.driver, sql = %sql, params = params.len(), "dml");
        self.backend.execute(&sql, params)
    }

    /// Run one or more parameterless statements.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` wrapping the driver error.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        tracing::debug!(driver = %self.driver, sql = %sql, "batch");
        self.backend.execute_batch(sql)
    }

    /// First row of [`Connection::execute`], if any.
    ///
    /// # Errors
    /// Same as [`Connection::execute`].
    pub fn first(&mut self, sql: &str, params: &[RowValues]) -> Result<Option<Row>> {
        Ok(self.execute(sql, params)?.into_iter().next())
    }

    /// Id generated by the most recent insert on this handle, when the backend reports one.
    pub fn last_insert_id(&mut self) -> Option<i64> {
        self.backend.last_insert_id()
    }

    /// Start a query bound to `table`. The name is not checked until execution.
    pub fn table(&mut self, name: impl Into<String>) -> TableQuery<'_> {
        TableQuery::new(self, name)
    }

    /// Close the handle, reporting any error from the shutdown. Dropping also closes.
    ///
    /// # Errors
    /// Returns the backend's shutdown error.
    pub fn close(self) -> Result<()> {
        let Connection {
            driver,
            config,
            backend,
        } = self;
        backend.close()?;
        tracing::info!(
            driver = %driver,
            database = config.database.as_deref().unwrap_or_default(),
            "database connection closed"
        );
        Ok(())
    }

    fn introspect(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        let sql = translate_placeholders(sql, self.driver.placeholder_style());
        tracing::debug!(driver = %self.driver, sql = %sql, params = params.len(), "introspect");
        self.backend.introspect(&sql, params)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("driver", &self.driver)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
