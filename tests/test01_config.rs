use sql_tablekit::prelude::*;

#[test]
fn unknown_driver_fails_before_connecting() {
    let config = ConnectionConfig::builder("oracle")
        .host("127.0.0.1")
        .database("db")
        .credentials("u", "p")
        .finish();
    let err = Connection::new(config).unwrap_err();
    assert!(matches!(err, TablekitError::ConfigError(_)), "{err}");
}

#[test]
fn every_driver_tag_validates_with_complete_config() -> Result<(), Box<dyn std::error::Error>> {
    for tag in ["mysql", "postgres", "sqlite", "mssql", "pgsql", "sqlsrv"] {
        let config = ConnectionConfig::builder(tag)
            .host("db.internal")
            .database("shop")
            .credentials("app", "secret")
            .finish();
        let driver = config.validate()?;
        assert!(Driver::ALL.contains(&driver));
        driver.connection_string(&config)?;
    }
    Ok(())
}

#[test]
fn missing_fields_are_config_errors() {
    // host missing: a postgres connection would otherwise be attempted
    let config = ConnectionConfig::builder("postgres")
        .database("shop")
        .credentials("app", "secret")
        .finish();
    let err = Connection::new(config).unwrap_err();
    assert!(matches!(err, TablekitError::ConfigError(_)), "{err}");

    let config = ConnectionConfig::builder("sqlite").finish();
    let err = Connection::new(config).unwrap_err();
    assert!(err.to_string().contains("database"), "{err}");
}

#[cfg(feature = "sqlite")]
#[test]
fn config_loads_from_json() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConnectionConfig::from_json(r#"{"driver": "sqlite", "database": ":memory:"}"#)?;
    let conn = Connection::new(config)?;
    assert_eq!(conn.driver(), Driver::Sqlite);
    assert_eq!(conn.config().database.as_deref(), Some(":memory:"));
    conn.close()?;
    Ok(())
}

#[cfg(feature = "sqlite")]
#[test]
fn builder_connects_directly() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = ConnectionConfig::builder("SQLite").database(":memory:").connect()?;
    let row = conn.first("SELECT 1 + 1 AS two", &[])?;
    assert_eq!(row.and_then(|r| r.get("two").cloned()), Some(RowValues::Int(2)));
    Ok(())
}
