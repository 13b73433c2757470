//! Per-driver SQL text.
//!
//! Everything that differs between backends at the SQL level is chosen here by matching on
//! [`Driver`]; the rest of the crate renders one canonical form.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::config::ConnectionConfig;
use crate::error::{Result, TablekitError};
use crate::results::Row;
use crate::translation::PlaceholderStyle;
use crate::types::RowValues;

/// The SQL dialect/backend a connection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// MySQL / MariaDB
    Mysql,
    /// `PostgreSQL`
    Postgres,
    /// `SQLite`
    Sqlite,
    /// SQL Server
    Mssql,
}

impl Driver {
    pub const ALL: [Driver; 4] = [Driver::Mysql, Driver::Postgres, Driver::Sqlite, Driver::Mssql];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Driver::Mysql => "mysql",
            Driver::Postgres => "postgres",
            Driver::Sqlite => "sqlite",
            Driver::Mssql => "mssql",
        }
    }

    /// Port used when the configuration leaves it out. `SQLite` has none.
    #[must_use]
    pub fn default_port(self) -> Option<u16> {
        match self {
            Driver::Mysql => Some(3306),
            Driver::Postgres => Some(5432),
            Driver::Sqlite => None,
            Driver::Mssql => Some(1433),
        }
    }

    /// Whether the backend is reached over the network (and so needs host and credentials).
    #[must_use]
    pub fn is_networked(self) -> bool {
        !matches!(self, Driver::Sqlite)
    }

    #[must_use]
    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Driver::Mysql | Driver::Sqlite => PlaceholderStyle::Positional,
            Driver::Postgres => PlaceholderStyle::Dollar,
            Driver::Mssql => PlaceholderStyle::AtP,
        }
    }

    /// Build the dialect-specific connection string from host, database, and port.
    ///
    /// Credentials are never part of the string; they are applied when the handle is opened.
    ///
    /// # Errors
    /// Returns `TablekitError::ConfigError` if a field the driver needs is missing.
    pub fn connection_string(self, config: &ConnectionConfig) -> Result<String> {
        let database = config.require("database", config.database.as_deref())?;
        if self == Driver::Sqlite {
            return Ok(database.to_string());
        }

        let host = config.require("host", config.host.as_deref())?;
        let port = config.port.or(self.default_port()).unwrap_or_default();
        Ok(match self {
            Driver::Mysql => format!("mysql://{host}:{port}/{database}"),
            Driver::Postgres => format!(
                "host={} port={port} dbname={}",
                libpq_quote(host),
                libpq_quote(database)
            ),
            Driver::Mssql => format!(
                "server=tcp:{host},{port};database={database};TrustServerCertificate=true"
            ),
            Driver::Sqlite => unreachable!("handled above"),
        })
    }

    /// Statement enumerating the tables of the current database; names are in column 0.
    #[must_use]
    pub fn list_tables_sql(self) -> &'static str {
        match self {
            Driver::Mysql => "SHOW TABLES",
            Driver::Postgres => {
                "SELECT table_name::text AS table_name FROM information_schema.tables \
                 WHERE table_schema = 'public' AND table_type = 'BASE TABLE' ORDER BY table_name"
            }
            Driver::Sqlite => {
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
            }
            Driver::Mssql => {
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_type = 'BASE TABLE' ORDER BY table_name"
            }
        }
    }

    /// Column introspection statement plus its parameters.
    ///
    /// The row shape is dialect-specific:
    /// - mysql `DESCRIBE`: `Field, Type, Null, Key, Default, Extra`
    /// - sqlite `PRAGMA table_info`: `cid, name, type, notnull, dflt_value, pk`
    /// - postgres/mssql information schema: `column_name, data_type, is_nullable, column_default`
    ///
    /// Use [`ColumnInfo::from_row`] for a uniform view.
    #[must_use]
    pub fn describe_columns_sql(self, table: &str) -> (String, Vec<RowValues>) {
        match self {
            Driver::Mysql => (format!("DESCRIBE {table}"), Vec::new()),
            Driver::Sqlite => (format!("PRAGMA table_info({table})"), Vec::new()),
            // information_schema columns are domains in postgres; cast so they decode as text
            Driver::Postgres => (
                "SELECT column_name::text AS column_name, data_type::text AS data_type, \
                 is_nullable::text AS is_nullable, column_default::text AS column_default \
                 FROM information_schema.columns \
                 WHERE table_schema = 'public' AND table_name::text = ? \
                 ORDER BY ordinal_position"
                    .to_string(),
                vec![RowValues::Text(table.to_string())],
            ),
            Driver::Mssql => (
                "SELECT column_name, data_type, is_nullable, column_default \
                 FROM information_schema.columns WHERE table_name = ? \
                 ORDER BY ordinal_position"
                    .to_string(),
                vec![RowValues::Text(table.to_string())],
            ),
        }
    }

    pub(crate) fn begin_sql(self) -> &'static str {
        match self {
            Driver::Mysql => "START TRANSACTION",
            Driver::Postgres | Driver::Sqlite => "BEGIN",
            Driver::Mssql => "BEGIN TRANSACTION",
        }
    }

    pub(crate) fn commit_sql(self) -> &'static str {
        match self {
            Driver::Mssql => "COMMIT TRANSACTION",
            _ => "COMMIT",
        }
    }

    pub(crate) fn rollback_sql(self) -> &'static str {
        match self {
            Driver::Mssql => "ROLLBACK TRANSACTION",
            _ => "ROLLBACK",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = TablekitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Driver::Mysql),
            "postgres" | "postgresql" | "pgsql" => Ok(Driver::Postgres),
            "sqlite" => Ok(Driver::Sqlite),
            "mssql" | "sqlsrv" | "sqlserver" => Ok(Driver::Mssql),
            other => Err(TablekitError::ConfigError(format!(
                "Unsupported database driver `{other}`. Supported drivers are: {}",
                Driver::ALL.map(Driver::as_str).join(", ")
            ))),
        }
    }
}

fn libpq_quote(value: &str) -> String {
    if !value.is_empty() && !value.contains([' ', '\'', '\\']) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Driver-independent view of one column's metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnInfo {
    /// Normalize one row of [`Driver::describe_columns_sql`] output.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if the row lacks the driver's name column.
    pub fn from_row(driver: Driver, row: &Row) -> Result<Self> {
        let (name_col, type_col, null_col, default_col) = match driver {
            Driver::Mysql => ("Field", "Type", "Null", "Default"),
            Driver::Sqlite => ("name", "type", "notnull", "dflt_value"),
            Driver::Postgres | Driver::Mssql => {
                ("column_name", "data_type", "is_nullable", "column_default")
            }
        };

        let name = row
            .get_ignore_case(name_col)
            .and_then(value_text)
            .ok_or_else(|| {
                TablekitError::query_msg(format!(
                    "{driver} column metadata row has no `{name_col}` value"
                ))
            })?;
        let data_type = row
            .get_ignore_case(type_col)
            .and_then(value_text)
            .unwrap_or_default();
        let nullable = match (driver, row.get_ignore_case(null_col)) {
            // PRAGMA table_info reports NOT NULL, so invert it
            (Driver::Sqlite, Some(v)) => v.as_integer() == Some(0),
            (_, Some(v)) => value_text(v).is_some_and(|s| s.eq_ignore_ascii_case("YES")),
            (_, None) => true,
        };
        let default = row.get_ignore_case(default_col).and_then(value_text);

        Ok(ColumnInfo {
            name,
            data_type,
            nullable,
            default,
        })
    }
}

fn value_text(value: &RowValues) -> Option<String> {
    match value {
        RowValues::Null => None,
        RowValues::Text(s) => Some(s.clone()),
        RowValues::Int(i) => Some(i.to_string()),
        RowValues::Float(f) => Some(f.to_string()),
        RowValues::Bool(b) => Some(b.to_string()),
        RowValues::Timestamp(dt) => Some(dt.to_string()),
        RowValues::JSON(v) => Some(v.to_string()),
        RowValues::Blob(bytes) => String::from_utf8(bytes.clone()).ok(),
    }
}
