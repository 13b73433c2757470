use tiberius::{AuthMethod, Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::error::{Result, TablekitError};

/// SQL Server client over a tokio TCP stream.
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Connect from an ADO-style connection string with SQL Server authentication.
///
/// # Errors
/// Returns `TablekitError::ConnectionError` if the string is malformed, the TCP connection
/// fails, or the login is rejected.
pub async fn create_mssql_client(
    conn_str: &str,
    user: &str,
    password: &str,
) -> Result<MssqlClient> {
    let mut config = Config::from_ado_string(conn_str)
        .map_err(|e| TablekitError::connection("invalid SQL Server connection string", e))?;
    config.authentication(AuthMethod::sql_server(user, password));
    config.trust_cert();

    let tcp = TcpStream::connect(config.get_addr())
        .await
        .map_err(|e| TablekitError::connection("SQL Server TCP connection error", e))?;
    tcp.set_nodelay(true)
        .map_err(|e| TablekitError::connection("SQL Server TCP connection error", e))?;

    Client::connect(config, tcp.compat_write())
        .await
        .map_err(|e| TablekitError::connection("SQL Server login failed", e))
}
