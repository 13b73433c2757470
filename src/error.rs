use thiserror::Error;

/// Native error raised by one of the backend drivers.
///
/// Kept as the `source` of [`TablekitError::QueryError`] and
/// [`TablekitError::ConnectionError`] so the driver's own message reaches the caller untouched.
#[derive(Debug, Error)]
pub enum DriverError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    Mysql(#[from] mysql::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    Mssql(#[from] tiberius::error::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum TablekitError {
    /// Bad or missing configuration, detected before any I/O.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The database handle could not be opened.
    #[error("Connection error: {context}: {source}")]
    ConnectionError {
        context: String,
        #[source]
        source: DriverError,
    },

    /// Statement execution failed; wraps the driver's native error.
    #[error("Query error: {0}")]
    QueryError(#[source] DriverError),

    /// UPDATE or DELETE attempted without any WHERE condition. Raised before SQL is sent.
    #[error("Safety error: {0}")]
    SafetyError(String),

    /// Caller-supplied payload or filter is unusable (empty insert data, bad operator, ...).
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TablekitError>;

impl TablekitError {
    pub(crate) fn connection(context: impl Into<String>, source: impl Into<DriverError>) -> Self {
        TablekitError::ConnectionError {
            context: context.into(),
            source: source.into(),
        }
    }

    pub(crate) fn query_msg(message: impl Into<String>) -> Self {
        TablekitError::QueryError(DriverError::Other(message.into()))
    }
}

impl From<DriverError> for TablekitError {
    fn from(err: DriverError) -> Self {
        TablekitError::QueryError(err)
    }
}

// Driver errors surfacing through `?` on an execution path are query failures.
macro_rules! query_error_from {
    ($($feature:literal => $ty:ty),* $(,)?) => {
        $(
            #[cfg(feature = $feature)]
            impl From<$ty> for TablekitError {
                fn from(err: $ty) -> Self {
                    TablekitError::QueryError(DriverError::from(err))
                }
            }
        )*
    };
}

query_error_from! {
    "sqlite" => rusqlite::Error,
    "postgres" => tokio_postgres::Error,
    "mysql" => mysql::Error,
    "mssql" => tiberius::error::Error,
}
