#![cfg(feature = "sqlite")]

mod common;

use sql_tablekit::prelude::*;

#[test]
fn lists_tables_in_name_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = common::memory_db()?;
    conn.execute_batch(
        "CREATE TABLE products (id INTEGER PRIMARY KEY, title TEXT);
         CREATE TABLE audit_log (id INTEGER PRIMARY KEY, message TEXT);",
    )?;
    assert_eq!(conn.list_tables()?, ["audit_log", "products", "users"]);
    Ok(())
}

#[test]
fn describe_returns_the_pragma_shape() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = common::memory_db()?;
    let raw = conn.table("users").describe()?;
    assert_eq!(raw.len(), 5);

    let names = raw
        .get_column_names()
        .map(|names| names.as_slice().to_vec())
        .unwrap_or_default();
    assert_eq!(names, ["cid", "name", "type", "notnull", "dflt_value", "pk"]);

    let second = &raw.results[1];
    assert_eq!(second.get("name"), Some(&RowValues::Text("name".into())));
    assert_eq!(second.get("notnull"), Some(&RowValues::Int(1)));

    let direct = conn.describe_columns("users")?;
    assert_eq!(direct.len(), raw.len());
    Ok(())
}

#[test]
fn columns_are_normalized() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = Connection::new(ConnectionConfig::sqlite(":memory:"))?;
    conn.execute_batch(
        "CREATE TABLE items (id INTEGER PRIMARY KEY, label TEXT NOT NULL, qty INTEGER DEFAULT 0)",
    )?;
    let columns = conn.columns("items")?;
    let expected = vec![
        ColumnInfo {
            name: "id".into(),
            data_type: "INTEGER".into(),
            nullable: true,
            default: None,
        },
        ColumnInfo {
            name: "label".into(),
            data_type: "TEXT".into(),
            nullable: false,
            default: None,
        },
        ColumnInfo {
            name: "qty".into(),
            data_type: "INTEGER".into(),
            nullable: true,
            default: Some("0".into()),
        },
    ];
    assert_eq!(columns, expected);

    assert!(conn.columns("missing")?.is_empty());
    Ok(())
}

#[test]
fn rollback_discards_and_commit_keeps() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = common::memory_db()?;

    conn.begin_transaction()?;
    conn.table("users").insert([("name", "Temp")])?;
    assert_eq!(common::row_count(&mut conn, "users")?, 1);
    conn.rollback()?;
    assert_eq!(common::row_count(&mut conn, "users")?, 0);

    conn.begin_transaction()?;
    conn.table("users").insert([("name", "Kept")])?;
    conn.commit()?;
    assert_eq!(common::row_count(&mut conn, "users")?, 1);

    let err = conn.commit().unwrap_err();
    assert!(matches!(err, TablekitError::QueryError(_)), "{err}");
    Ok(())
}

#[test]
fn summary_lists_driver_and_tables() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = common::memory_db()?;
    let summary = conn.summary()?;
    assert_eq!(
        summary,
        serde_json::json!({
            "driver": "sqlite",
            "database": ":memory:",
            "host": null,
            "tables": ["users"],
        })
    );

    let text = conn.to_json()?;
    let reparsed: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(reparsed, summary);
    assert!(text.contains('\n'));
    Ok(())
}

#[test]
fn explicit_close_reports_success() -> Result<(), Box<dyn std::error::Error>> {
    let conn = common::memory_db()?;
    assert_eq!(conn.driver(), Driver::Sqlite);
    assert_eq!(conn.config().database.as_deref(), Some(":memory:"));
    conn.close()?;
    Ok(())
}
