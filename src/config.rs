use std::fmt;

use serde::Deserialize;

use crate::connection::Connection;
use crate::dialect::Driver;
use crate::error::{Result, TablekitError};

/// Connection settings as supplied by the caller.
///
/// `driver` stays a raw string until [`ConnectionConfig::validate`] so an unknown tag is a
/// configuration error rather than a deserialization failure.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub driver: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

impl ConnectionConfig {
    /// Start a builder for the given driver tag.
    #[must_use]
    pub fn builder(driver: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder {
            config: ConnectionConfig {
                driver: driver.into(),
                ..ConnectionConfig::default()
            },
        }
    }

    /// `SQLite` settings for a file path or `:memory:`.
    #[must_use]
    pub fn sqlite(path: impl Into<String>) -> Self {
        ConnectionConfig {
            driver: Driver::Sqlite.as_str().to_string(),
            database: Some(path.into()),
            ..ConnectionConfig::default()
        }
    }

    /// Parse settings from a JSON object.
    ///
    /// # Errors
    /// Returns `TablekitError::ConfigError` if the text is not a valid settings object.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| TablekitError::ConfigError(format!("invalid connection settings: {e}")))
    }

    /// Check the driver tag and required fields without touching the network.
    ///
    /// Every driver needs `database`; the networked drivers also need `host`, `username`, and
    /// `password`. Empty strings count as missing.
    ///
    /// # Errors
    /// Returns `TablekitError::ConfigError` naming the first problem found.
    pub fn validate(&self) -> Result<Driver> {
        let driver: Driver = self.driver.parse()?;
        self.require("database", self.database.as_deref())?;
        if driver.is_networked() {
            self.require("host", self.host.as_deref())?;
            self.require("username", self.username.as_deref())?;
            self.require("password", self.password.as_deref())?;
        }
        Ok(driver)
    }

    pub(crate) fn require<'a>(&self, field: &str, value: Option<&'a str>) -> Result<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(TablekitError::ConfigError(format!(
                "Missing required config field `{field}` for driver `{}`",
                self.driver
            ))),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .finish()
    }
}

/// Fluent construction of a [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectionConfig {
        self.config
    }

    /// Validate and open in one step.
    ///
    /// # Errors
    /// Same as [`Connection::new`].
    pub fn connect(self) -> Result<Connection> {
        Connection::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_needs_only_database() {
        let cfg = ConnectionConfig::sqlite(":memory:");
        assert_eq!(cfg.validate().unwrap(), Driver::Sqlite);
    }

    #[test]
    fn networked_drivers_need_host_and_credentials() {
        let cfg = ConnectionConfig::builder("postgres").database("shop").finish();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("`host`"), "{err}");

        let cfg = ConnectionConfig::builder("mysql")
            .host("localhost")
            .database("shop")
            .credentials("app", "")
            .finish();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("`password`"), "{err}");
    }

    #[test]
    fn deserializes_with_optional_fields() {
        let cfg = ConnectionConfig::from_json(
            r#"{"driver": "sqlsrv", "host": "db", "database": "erp",
                "username": "sa", "password": "pw", "port": 14330}"#,
        )
        .unwrap();
        assert_eq!(cfg.validate().unwrap(), Driver::Mssql);
        assert_eq!(cfg.port, Some(14330));

        let err = ConnectionConfig::from_json(r#"{"host": "db"}"#).unwrap_err();
        assert!(matches!(err, TablekitError::ConfigError(_)));
    }

    #[test]
    fn debug_hides_password() {
        let cfg = ConnectionConfig::builder("mysql")
            .host("localhost")
            .database("shop")
            .credentials("app", "hunter2")
            .finish();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
