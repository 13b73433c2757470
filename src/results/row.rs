use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::RowValues;

/// A row from a query result.
///
/// Column names and the name-to-index lookup are shared by every row of the same result set.
#[derive(Debug, Clone)]
pub struct Row {
    /// The column names for this row, in select-list order
    pub column_names: Arc<Vec<String>>,
    /// The values for this row, parallel to `column_names`
    pub values: Vec<RowValues>,
    column_index: Arc<HashMap<String, usize>>,
}

impl Row {
    /// Create a row, building its own column index.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let column_index = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            values,
            column_index,
        }
    }

    pub(crate) fn with_index(
        column_names: Arc<Vec<String>>,
        column_index: Arc<HashMap<String, usize>>,
        values: Vec<RowValues>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index.get(column_name).copied()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column name, ignoring ASCII case.
    ///
    /// Introspection queries return `COLUMN_NAME` or `column_name` depending on the server.
    #[must_use]
    pub fn get_ignore_case(&self, column_name: &str) -> Option<&RowValues> {
        self.get(column_name).or_else(|| {
            self.column_names
                .iter()
                .position(|c| c.eq_ignore_ascii_case(column_name))
                .and_then(|idx| self.values.get(idx))
        })
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Iterate `(column, value)` pairs in select-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        // first occurrence wins for duplicate names (e.g. joins selecting `id` twice)
        index.entry(name.clone()).or_insert(i);
    }
    index
}
