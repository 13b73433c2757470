#![cfg(feature = "sqlite")]

mod common;

use chrono::{Local, NaiveDate};
use regex::Regex;
use sql_tablekit::prelude::*;

#[test]
fn fake_rows_land_in_a_file_database() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fake.db");
    let path = path.to_str().ok_or("non-utf8 temp path")?;

    let mut conn = Connection::new(ConnectionConfig::sqlite(path))?;
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, email TEXT, created_at TEXT)",
    )?;

    let inserted = conn.table("users").generate_fake_data(5)?;
    assert_eq!(inserted, 5);
    conn.close()?;

    // reopen to prove the rows were committed to disk
    let mut conn = Connection::new(ConnectionConfig::sqlite(path))?;
    let rows = conn.table("users").order_by("id", Direction::Asc).get()?;
    assert_eq!(rows.len(), 5);

    let email_re = Regex::new(r"^user\d+@example\.com$")?;
    let today = Local::now().date_naive();
    for (i, row) in rows.iter().enumerate() {
        let expected_id = i64::try_from(i)? + 1;
        assert_eq!(row.get("id"), Some(&RowValues::Int(expected_id)));

        let name = row.get("name").and_then(RowValues::as_text).ok_or("name missing")?;
        assert!(!name.is_empty());

        let email = row.get("email").and_then(RowValues::as_text).ok_or("email missing")?;
        assert!(email_re.is_match(email), "{email}");

        let created = row
            .get("created_at")
            .and_then(RowValues::as_text)
            .ok_or("created_at missing")?;
        let created = NaiveDate::parse_from_str(created, "%Y-%m-%d")?;
        let age = today.signed_duration_since(created).num_days();
        // a day of slack for a run that straddles midnight
        assert!((-1..=366).contains(&age), "{created} is {age} days old");
    }
    Ok(())
}

#[test]
fn fake_values_follow_column_names() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = Connection::new(ConnectionConfig::sqlite(":memory:"))?;
    conn.execute_batch(
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, order_date TEXT, ship_time TEXT, \
         total_amount REAL, note TEXT)",
    )?;
    assert_eq!(conn.table("orders").generate_fake_data(3)?, 3);

    let time_re = Regex::new(r"^\d{2}:\d{2}:\d{2}$")?;
    for row in &conn.table("orders").get()? {
        let date = row.get("order_date").and_then(RowValues::as_text).ok_or("no date")?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")?;

        let time = row.get("ship_time").and_then(RowValues::as_text).ok_or("no time")?;
        assert!(time_re.is_match(time), "{time}");

        let amount = row.get("total_amount").and_then(RowValues::as_float).ok_or("no amount")?;
        assert!((10.0..=1000.0).contains(&amount), "{amount}");

        assert_eq!(row.get("note"), Some(&RowValues::Text("Sample data for note".into())));
    }
    Ok(())
}

#[test]
fn zero_rows_and_missing_tables() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = common::memory_db()?;
    assert_eq!(conn.table("users").generate_fake_data(0)?, 0);
    assert_eq!(common::row_count(&mut conn, "users")?, 0);

    let err = conn.table("no_such_table").generate_fake_data(2).unwrap_err();
    assert!(matches!(err, TablekitError::QueryError(_)), "{err}");
    Ok(())
}

#[test]
fn id_only_tables_get_default_rows() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = Connection::new(ConnectionConfig::sqlite(":memory:"))?;
    conn.execute_batch("CREATE TABLE tickets (id INTEGER PRIMARY KEY)")?;

    assert_eq!(conn.table("tickets").generate_fake_data(3)?, 3);
    let ids = conn.table("tickets").order_by("id", Direction::Asc).get()?;
    assert_eq!(ids.column(0), vec![&RowValues::Int(1), &RowValues::Int(2), &RowValues::Int(3)]);
    Ok(())
}
