#[cfg(any(feature = "postgres", feature = "mssql"))]
use tokio::runtime::{Builder, Runtime};

use crate::config::ConnectionConfig;
use crate::dialect::Driver;
use crate::error::{Result, TablekitError};
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "mssql")]
use crate::mssql::MssqlHandle;
#[cfg(feature = "mysql")]
use crate::mysql::MysqlHandle;
#[cfg(feature = "postgres")]
use crate::postgres::PostgresHandle;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteHandle;

/// Runtime owned by one network handle; driver futures only run inside its `block_on`.
///
/// # Errors
/// Returns `TablekitError::ConnectionError` if the runtime cannot be built.
#[cfg(any(feature = "postgres", feature = "mssql"))]
pub(crate) fn current_thread_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TablekitError::connection("failed to start driver runtime", e))
}

/// The one live handle behind a [`Connection`](super::Connection).
pub(crate) enum Backend {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteHandle),
    #[cfg(feature = "postgres")]
    Postgres(PostgresHandle),
    #[cfg(feature = "mysql")]
    Mysql(MysqlHandle),
    #[cfg(feature = "mssql")]
    Mssql(MssqlHandle),
}

impl Backend {
    /// Open the handle for an already validated config.
    pub(crate) fn open(driver: Driver, config: &ConnectionConfig) -> Result<Self> {
        let conn_str = driver.connection_string(config)?;
        #[allow(unused_variables)]
        let (username, password) = (
            config.username.as_deref().unwrap_or_default(),
            config.password.as_deref().unwrap_or_default(),
        );

        match driver {
            #[cfg(feature = "sqlite")]
            Driver::Sqlite => Ok(Backend::Sqlite(SqliteHandle::open(&conn_str)?)),
            #[cfg(feature = "postgres")]
            Driver::Postgres => Ok(Backend::Postgres(PostgresHandle::open(
                &conn_str, username, password,
            )?)),
            #[cfg(feature = "mysql")]
            Driver::Mysql => Ok(Backend::Mysql(MysqlHandle::open(
                &conn_str, username, password,
            )?)),
            #[cfg(feature = "mssql")]
            Driver::Mssql => Ok(Backend::Mssql(MssqlHandle::open(
                &conn_str, username, password,
            )?)),
            #[allow(unreachable_patterns)]
            other => Err(TablekitError::ConfigError(format!(
                "driver `{other}` is not compiled in; enable the `{other}` feature"
            ))),
        }
    }

    pub(crate) fn query(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        match self {
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(handle) => handle.query(sql, params),
            #[cfg(feature = "postgres")]
            Backend::Postgres(handle) => handle.query(sql, params),
            #[cfg(feature = "mysql")]
            Backend::Mysql(handle) => handle.query(sql, params),
            #[cfg(feature = "mssql")]
            Backend::Mssql(handle) => handle.query(sql, params),
        }
    }

    /// Like [`Backend::query`], except MySQL runs parameterless statements over the text
    /// protocol because `SHOW` and `DESCRIBE` cannot always be prepared.
    pub(crate) fn introspect(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        match self {
            #[cfg(feature = "mysql")]
            Backend::Mysql(handle) if params.is_empty() => handle.query_text(sql),
            _ => self.query(sql, params),
        }
    }

    pub(crate) fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize> {
        match self {
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(handle) => handle.execute(sql, params),
            #[cfg(feature = "postgres")]
            Backend::Postgres(handle) => handle.execute(sql, params),
            #[cfg(feature = "mysql")]
            Backend::Mysql(handle) => handle.execute(sql, params),
            #[cfg(feature = "mssql")]
            Backend::Mssql(handle) => handle.execute(sql, params),
        }
    }

    pub(crate) fn execute_batch(&mut self, sql: &str) -> Result<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(handle) => handle.execute_batch(sql),
            #[cfg(feature = "postgres")]
            Backend::Postgres(handle) => handle.execute_batch(sql),
            #[cfg(feature = "mysql")]
            Backend::Mysql(handle) => handle.execute_batch(sql),
            #[cfg(feature = "mssql")]
            Backend::Mssql(handle) => handle.execute_batch(sql),
        }
    }

    pub(crate) fn last_insert_id(&mut self) -> Option<i64> {
        match self {
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(handle) => handle.last_insert_id(),
            #[cfg(feature = "postgres")]
            Backend::Postgres(handle) => handle.last_insert_id(),
            #[cfg(feature = "mysql")]
            Backend::Mysql(handle) => handle.last_insert_id(),
            #[cfg(feature = "mssql")]
            Backend::Mssql(handle) => handle.last_insert_id(),
        }
    }

    pub(crate) fn close(self) -> Result<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(handle) => handle.close(),
            #[cfg(feature = "postgres")]
            Backend::Postgres(handle) => handle.close(),
            #[cfg(feature = "mysql")]
            Backend::Mysql(handle) => handle.close(),
            #[cfg(feature = "mssql")]
            Backend::Mssql(handle) => handle.close(),
        }
    }
}
