//! Blocking, driver-agnostic database access for command-line tools.
//!
//! A [`Connection`] wraps one MySQL, `PostgreSQL`, `SQLite`, or SQL Server handle behind the
//! same synchronous API. [`Connection::table`] hands out a [`TableQuery`] that accumulates
//! filters, ordering, and pagination and renders them to parameterized SQL on a terminal call.
//!
//! ```rust,no_run
//! use sql_tablekit::prelude::*;
//!
//! # fn main() -> Result<(), TablekitError> {
//! let mut conn = Connection::new(ConnectionConfig::sqlite(":memory:"))?;
//! conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, email TEXT)")?;
//!
//! conn.table("users")
//!     .insert([("name", "Ali"), ("email", "ali@example.com")])?;
//! let n = conn.table("users").where_("name", Operator::Eq, "Ali").count()?;
//! assert_eq!(n, 1);
//!
//! // UPDATE and DELETE refuse to run without a condition
//! assert!(conn.table("users").delete().is_err());
//! # Ok(())
//! # }
//! ```
//!
//! Every backend is behind a cargo feature (`sqlite`, `postgres`, `mysql`, `mssql`), all on
//! by default.

pub mod config;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod translation;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use connection::Connection;
pub use dialect::{ColumnInfo, Driver};
pub use error::{DriverError, Result, TablekitError};
pub use query_builder::{Condition, Direction, Operator, QueryState, RawQuery, TableQuery};
pub use results::{ResultSet, Row};
pub use types::{Record, RowValues, record_from_json};
