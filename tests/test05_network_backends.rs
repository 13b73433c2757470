//! Round trips against live servers. Each test is a no-op unless
//! `TABLEKIT_TEST_<DRIVER>_HOST` is set, together with `_DATABASE`, `_USER`, `_PASSWORD`,
//! and optionally `_PORT`.

mod common;

use sql_tablekit::prelude::*;

fn env_config(driver: Driver) -> Option<ConnectionConfig> {
    let prefix = format!("TABLEKIT_TEST_{}", driver.as_str().to_ascii_uppercase());
    let var = |suffix: &str| std::env::var(format!("{prefix}_{suffix}")).ok();

    let mut builder = ConnectionConfig::builder(driver.as_str())
        .host(var("HOST")?)
        .database(var("DATABASE")?)
        .credentials(var("USER")?, var("PASSWORD")?);
    if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
        builder = builder.port(port);
    }
    Some(builder.finish())
}

fn id_column(driver: Driver) -> &'static str {
    match driver {
        Driver::Mysql => "INT AUTO_INCREMENT PRIMARY KEY",
        Driver::Postgres => "SERIAL PRIMARY KEY",
        Driver::Mssql => "INT IDENTITY(1,1) PRIMARY KEY",
        Driver::Sqlite => "INTEGER PRIMARY KEY",
    }
}

fn round_trip(driver: Driver) -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = env_config(driver) else {
        eprintln!("skipping {driver}: no TABLEKIT_TEST_* settings");
        return Ok(());
    };
    common::init_tracing();

    let table = "tablekit_roundtrip";
    let fake_table = "tablekit_fake";
    let mut conn = Connection::new(config)?;
    for t in [table, fake_table] {
        // a clean server has nothing to drop
        let _ = conn.execute_batch(&format!("DROP TABLE {t}"));
    }
    conn.execute_batch(&format!(
        "CREATE TABLE {table} (id {}, name VARCHAR(100), email VARCHAR(200), age INT)",
        id_column(driver)
    ))?;

    for (name, age) in [("Ali", 31), ("Sara", 27), ("Reza", 45)] {
        let email = format!("{}@example.com", name.to_lowercase());
        conn.table(table).insert([
            ("name", RowValues::from(name)),
            ("email", email.into()),
            ("age", age.into()),
        ])?;
    }
    assert!(conn.last_insert_id().is_some());
    assert!(conn.list_tables()?.iter().any(|t| t == table));

    let columns = conn.columns(table)?;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "name", "email", "age"]);

    assert_eq!(conn.table(table).count()?, 3);
    assert_eq!(conn.table(table).where_("age", Operator::Gt, 30).count()?, 2);

    let page = conn
        .table(table)
        .select(["name"])
        .order_by("age", Direction::Asc)
        .limit(1)
        .offset(1)
        .get()?;
    assert_eq!(page.len(), 1);
    assert_eq!(page.results[0].get("name"), Some(&RowValues::Text("Ali".into())));

    let updated = conn
        .table(table)
        .where_("name", Operator::Eq, "Sara")
        .update([("age", 28)])?;
    assert_eq!(updated, 1);

    let err = conn.table(table).delete().unwrap_err();
    assert!(matches!(err, TablekitError::SafetyError(_)), "{err}");

    conn.begin_transaction()?;
    conn.table(table).where_("age", Operator::Ge, 0).delete()?;
    conn.rollback()?;
    assert_eq!(conn.table(table).count()?, 3);

    conn.execute_batch(&format!("DROP TABLE {table}"))?;

    conn.execute_batch(&format!(
        "CREATE TABLE {fake_table} (id {}, name VARCHAR(100), email VARCHAR(200), \
         created_at VARCHAR(20))",
        id_column(driver)
    ))?;
    assert_eq!(conn.table(fake_table).generate_fake_data(2)?, 2);
    assert_eq!(conn.table(fake_table).count()?, 2);
    conn.execute_batch(&format!("DROP TABLE {fake_table}"))?;
    conn.close()?;
    Ok(())
}

#[cfg(feature = "postgres")]
#[test]
fn postgres_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    round_trip(Driver::Postgres)
}

// a fresh session has never called nextval, so the id lookup has nothing to report
#[cfg(feature = "postgres")]
#[test]
fn postgres_id_lookup_keeps_the_transaction_usable() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = env_config(Driver::Postgres) else {
        return Ok(());
    };
    let table = "tablekit_no_serial";
    let mut conn = Connection::new(config)?;
    let _ = conn.execute_batch(&format!("DROP TABLE {table}"));
    conn.execute_batch(&format!("CREATE TABLE {table} (name VARCHAR(20))"))?;

    // reopen so no sequence has been touched in this session
    let config = conn.config().clone();
    conn.close()?;
    let mut conn = Connection::new(config)?;

    conn.begin_transaction()?;
    conn.table(table).insert([("name", "first")])?;
    assert_eq!(conn.last_insert_id(), None);
    conn.table(table).insert([("name", "second")])?;
    conn.commit()?;
    assert_eq!(conn.table(table).count()?, 2);

    conn.execute_batch(&format!("DROP TABLE {table}"))?;
    conn.close()?;
    Ok(())
}

#[cfg(feature = "postgres")]
#[test]
fn postgres_fractional_float_into_integer_column_fails() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = env_config(Driver::Postgres) else {
        return Ok(());
    };
    let table = "tablekit_int_only";
    let mut conn = Connection::new(config)?;
    let _ = conn.execute_batch(&format!("DROP TABLE {table}"));
    conn.execute_batch(&format!("CREATE TABLE {table} (qty BIGINT)"))?;

    let err = conn.table(table).insert([("qty", 123.45)]).unwrap_err();
    assert!(matches!(err, TablekitError::QueryError(_)), "{err}");
    assert_eq!(conn.table(table).count()?, 0);

    conn.table(table).insert([("qty", 7.0)])?;
    let row = conn.table(table).first()?.ok_or("no row")?;
    assert_eq!(row.get("qty"), Some(&RowValues::Int(7)));

    conn.execute_batch(&format!("DROP TABLE {table}"))?;
    conn.close()?;
    Ok(())
}

#[cfg(feature = "mysql")]
#[test]
fn mysql_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    round_trip(Driver::Mysql)
}

#[cfg(feature = "mssql")]
#[test]
fn mssql_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    round_trip(Driver::Mssql)
}

#[test]
fn unreachable_server_is_a_connection_error() -> Result<(), Box<dyn std::error::Error>> {
    if !cfg!(feature = "postgres") {
        return Ok(());
    }
    // port 1 on localhost is reliably closed
    let result = ConnectionConfig::builder("postgres")
        .host("127.0.0.1")
        .port(1)
        .database("nothing")
        .credentials("nobody", "nothing")
        .connect();
    let err = result.unwrap_err();
    assert!(matches!(err, TablekitError::ConnectionError { .. }), "{err}");
    Ok(())
}
