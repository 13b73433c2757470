use chrono::{Duration, Local, NaiveDateTime};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::TableQuery;
use super::render;
use crate::error::{Result, TablekitError};
use crate::types::{Record, RowValues};

const NAMES: [&str; 6] = ["Ali", "Mohammad", "Sara", "Fatemeh", "Reza", "Zahra"];

/// Value for one column, picked from its name alone; the declared SQL type is ignored.
///
/// Checked in order, case-insensitively: `email`, `name`, `date` (or an `_at`/`_on` suffix),
/// `time`, `price`/`amount`, then a placeholder string.
pub(crate) fn fake_value<R: Rng + ?Sized>(
    column: &str,
    rng: &mut R,
    now: NaiveDateTime,
) -> RowValues {
    let lower = column.to_ascii_lowercase();

    if lower.contains("email") {
        RowValues::Text(format!("user{}@example.com", rng.random_range(1..=1000)))
    } else if lower.contains("name") {
        let name = NAMES.choose(rng).copied().unwrap_or(NAMES[0]);
        RowValues::Text(name.to_string())
    } else if lower.contains("date") || lower.ends_with("_at") || lower.ends_with("_on") {
        let days_ago = rng.random_range(0..=365);
        let day = now.date() - Duration::days(days_ago);
        RowValues::Text(day.format("%Y-%m-%d").to_string())
    } else if lower.contains("time") {
        RowValues::Text(now.format("%H:%M:%S").to_string())
    } else if lower.contains("price") || lower.contains("amount") {
        let cents: u32 = rng.random_range(1_000..=100_000);
        RowValues::Float(f64::from(cents) / 100.0)
    } else {
        RowValues::Text(format!("Sample data for {column}"))
    }
}

impl TableQuery<'_> {
    /// Insert `count` synthetic rows, one INSERT each, and return how many were inserted.
    ///
    /// Column names come from [`crate::Connection::columns`]; a column named exactly `id` is
    /// left to the database. A table with no other column gets rows of defaults.
    ///
    /// # Errors
    /// Returns `TablekitError::QueryError` if the table has no columns or an insert fails.
    pub fn generate_fake_data(&mut self, count: usize) -> Result<usize> {
        if count == 0 {
            return Ok(0);
        }
        let columns = self.conn.columns(&self.table)?;
        if columns.is_empty() {
            return Err(TablekitError::query_msg(format!(
                "table `{}` does not exist or has no columns",
                self.table
            )));
        }

        let mut rng = rand::rng();
        let mut inserted = 0;
        for n in 1..=count {
            let now = Local::now().naive_local();
            let record: Record = columns
                .iter()
                .filter(|c| c.name != "id")
                .map(|c| (c.name.clone(), fake_value(&c.name, &mut rng, now)))
                .collect();
            tracing::debug!(table = %self.table, row = n, columns = record.len(), "synthetic row");
            inserted += if record.is_empty() {
                // nothing but `id`: let every column take its default
                let query = render::default_row_sql(self.conn.driver(), &self.table);
                self.conn.execute_dml(&query.sql, &query.params)?
            } else {
                self.insert(record)?
            };
        }
        Ok(inserted)
    }
}
