// PostgreSQL backend: one tokio-postgres client driven by a private current-thread runtime.
//
// - params: RowValues -> ToSql, encoded for the inferred column type
// - query: row extraction and result materialization

pub mod params;
pub mod query;

use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use crate::error::{Result, TablekitError};
use crate::results::ResultSet;
use crate::types::RowValues;

pub use params::Params;
pub use query::{build_result_set_from_statement, postgres_extract_value};

// 55000 is what `lastval()` raises before any sequence has been used in the session
const LASTVAL_SQL: &str = "DO $$ BEGIN \
    PERFORM set_config('tablekit.lastval', lastval()::text, false); \
    EXCEPTION WHEN object_not_in_prerequisite_state THEN \
    PERFORM set_config('tablekit.lastval', '', false); \
    END $$";

/// Open `PostgreSQL` session.
pub struct PostgresHandle {
    client: Client,
    connection_task: JoinHandle<()>,
    rt: Runtime,
}

impl PostgresHandle {
    /// Connect using a libpq keyword string, applying credentials separately.
    ///
    /// # Errors
    /// Returns `TablekitError::ConnectionError` if the runtime cannot start, the string is
    /// malformed, or the server refuses the session.
    pub fn open(conn_str: &str, username: &str, password: &str) -> Result<Self> {
        let rt = crate::connection::backend::current_thread_runtime()?;
        let mut pg_config: tokio_postgres::Config = conn_str
            .parse()
            .map_err(|e| TablekitError::connection("invalid postgres connection string", e))?;
        pg_config.user(username).password(password);

        let (client, connection) = rt
            .block_on(pg_config.connect(NoTls))
            .map_err(|e| TablekitError::connection("failed to connect to postgres", e))?;

        // The connection future drives the socket; it only makes progress inside block_on.
        let connection_task = rt.spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection closed with error");
            }
        });

        Ok(Self {
            client,
            connection_task,
            rt,
        })
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` on prepare or execution failure.
    pub fn query(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        let converted = Params::convert(params);
        let client = &self.client;
        self.rt.block_on(async {
            let stmt = client.prepare(sql).await?;
            let rows = client.query(&stmt, converted.as_refs()).await?;
            build_result_set_from_statement(&stmt, &rows)
        })
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` on prepare or execution failure.
    pub fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize> {
        let converted = Params::convert(params);
        let rows = self
            .rt
            .block_on(self.client.execute(sql, converted.as_refs()))?;
        usize::try_from(rows).map_err(|e| {
            TablekitError::query_msg(format!("postgres affected rows conversion error: {e}"))
        })
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if any statement fails.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        Ok(self.rt.block_on(self.client.batch_execute(sql))?)
    }

    /// Value most recently produced by `nextval` in this session.
    ///
    /// `lastval()` raises when no sequence has been used yet, and a raised error would abort an
    /// open transaction. The call runs inside a PL/pgSQL exception block instead, which rolls
    /// back only its own subtransaction, and hands the result over through a session setting.
    #[must_use]
    pub fn last_insert_id(&mut self) -> Option<i64> {
        let client = &self.client;
        self.rt.block_on(async {
            client.batch_execute(LASTVAL_SQL).await.ok()?;
            let row = client
                .query_one("SELECT current_setting('tablekit.lastval', true)", &[])
                .await
                .ok()?;
            row.try_get::<_, Option<String>>(0).ok()??.parse().ok()
        })
    }

    /// # Errors
    /// Returns `TablekitError::ConnectionError` if the connection task ended abnormally.
    pub fn close(self) -> Result<()> {
        let PostgresHandle {
            client,
            connection_task,
            rt,
        } = self;
        // Dropping the client sends Terminate; the connection future then finishes.
        drop(client);
        rt.block_on(connection_task).map_err(|e| {
            TablekitError::connection(
                "postgres connection task failed",
                crate::error::DriverError::Other(e.to_string()),
            )
        })
    }
}
