// SQL Server backend: one tiberius client driven by a private current-thread runtime.
//
// - client: connection setup from an ADO string
// - params: RowValues -> bound tiberius parameters
// - query: result materialization and value extraction

pub mod client;
pub mod params;
pub mod query;

use tokio::runtime::Runtime;

use crate::error::{Result, TablekitError};
use crate::results::ResultSet;
use crate::types::RowValues;

pub use client::{MssqlClient, create_mssql_client};
pub use params::bind_query_params;
pub use query::{build_result_set, extract_value};

/// Open SQL Server session.
pub struct MssqlHandle {
    client: MssqlClient,
    rt: Runtime,
}

impl MssqlHandle {
    /// # Errors
    /// Returns `TablekitError::ConnectionError` if the runtime cannot start or login fails.
    pub fn open(conn_str: &str, username: &str, password: &str) -> Result<Self> {
        let rt = crate::connection::backend::current_thread_runtime()?;
        let client = rt.block_on(create_mssql_client(conn_str, username, password))?;
        Ok(Self { client, rt })
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` on execution failure.
    pub fn query(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet> {
        self.rt.block_on(build_result_set(&mut self.client, sql, params))
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` on execution failure.
    pub fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize> {
        let client = &mut self.client;
        let result = self
            .rt
            .block_on(bind_query_params(sql, params).execute(client))?;
        let total: u64 = result.rows_affected().iter().sum();
        Ok(usize::try_from(total).unwrap_or(usize::MAX))
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if any statement fails.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        let client = &mut self.client;
        self.rt.block_on(async {
            client.simple_query(sql).await?.into_results().await?;
            Ok::<(), TablekitError>(())
        })
    }

    /// Identity value of the most recent insert in this session.
    #[must_use]
    pub fn last_insert_id(&mut self) -> Option<i64> {
        let client = &mut self.client;
        self.rt.block_on(async {
            let row = client
                .simple_query("SELECT CAST(@@IDENTITY AS BIGINT)")
                .await
                .ok()?
                .into_row()
                .await
                .ok()??;
            row.try_get::<i64, _>(0).ok().flatten()
        })
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if the server rejects the logout.
    pub fn close(self) -> Result<()> {
        let MssqlHandle { client, rt } = self;
        Ok(rt.block_on(client.close())?)
    }
}
