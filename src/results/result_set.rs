use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, Serializer};

use super::row::{Row, index_columns};
use crate::types::RowValues;

/// Fully materialized result of one statement.
///
/// A statement matching zero rows yields an empty set, never an absent value.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query, in server order
    pub results: Vec<Row>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            ..ResultSet::default()
        }
    }

    /// Set the column names shared by all rows added afterwards.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(index_columns(&column_names)));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row built from values in column order.
    ///
    /// Rows are ignored until column names have been set.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(names), Some(index)) = (&self.column_names, &self.column_index) {
            self.results
                .push(Row::with_index(Arc::clone(names), Arc::clone(index), row_values));
            self.rows_affected += 1;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.results.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.results.iter()
    }

    /// Values of one column across all rows, by position.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<&RowValues> {
        self.results
            .iter()
            .filter_map(|row| row.get_by_index(index))
            .collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["id".into(), "name".into()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("Ali".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("Sara".into())]);
        rs
    }

    #[test]
    fn rows_share_column_lookup() {
        let rs = sample();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.results[1].get("name"), Some(&RowValues::Text("Sara".into())));
        assert_eq!(rs.results[0].get_ignore_case("NAME"), Some(&RowValues::Text("Ali".into())));
        assert!(rs.results[0].get("missing").is_none());
        assert_eq!(rs.column(0), vec![&RowValues::Int(1), &RowValues::Int(2)]);
    }

    #[test]
    fn rows_without_columns_are_dropped() {
        let mut rs = ResultSet::default();
        rs.add_row_values(vec![RowValues::Int(1)]);
        assert!(rs.is_empty());
    }

    #[test]
    fn serializes_as_array_of_objects() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"[{"id":1,"name":"Ali"},{"id":2,"name":"Sara"}]"#);
    }
}
