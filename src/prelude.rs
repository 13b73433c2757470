//! Convenient imports for common functionality.
//!
//! ```rust
//! use sql_tablekit::prelude::*;
//! ```

pub use crate::config::{ConnectionConfig, ConnectionConfigBuilder};
pub use crate::connection::Connection;
pub use crate::dialect::{ColumnInfo, Driver};
pub use crate::error::TablekitError;
pub use crate::filter::{parse_conditions, parse_order};
pub use crate::query_builder::{Condition, Direction, Operator, RawQuery, TableQuery};
pub use crate::results::{ResultSet, Row};
pub use crate::translation::{PlaceholderStyle, translate_placeholders};
pub use crate::types::{Record, RowValues, record_from_json};
