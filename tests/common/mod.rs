#![allow(dead_code)]

use sql_tablekit::prelude::*;

pub const USERS_DDL: &str = "CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    age INTEGER,
    created_at TEXT
)";

/// In-memory SQLite connection with an empty `users` table.
pub fn memory_db() -> Result<Connection, TablekitError> {
    let mut conn = Connection::new(ConnectionConfig::sqlite(":memory:"))?;
    conn.execute_batch(USERS_DDL)?;
    Ok(conn)
}

pub fn seed_users(conn: &mut Connection) -> Result<(), TablekitError> {
    for (name, email, age) in [
        ("Ali", "ali@example.com", 31),
        ("Sara", "sara@example.com", 27),
        ("Reza", "reza@example.com", 45),
    ] {
        conn.table("users").insert([
            ("name", RowValues::from(name)),
            ("email", RowValues::from(email)),
            ("age", RowValues::from(age)),
        ])?;
    }
    Ok(())
}

pub fn row_count(conn: &mut Connection, table: &str) -> Result<i64, TablekitError> {
    let row = conn.first(&format!("SELECT COUNT(*) AS n FROM {table}"), &[])?;
    Ok(row
        .and_then(|r| r.get("n").and_then(RowValues::as_integer))
        .unwrap_or(0))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
