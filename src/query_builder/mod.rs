use std::fmt;
use std::str::FromStr;

use crate::connection::Connection;
use crate::error::{Result, TablekitError};
use crate::types::RowValues;

mod dml;
mod fake;
mod render;
mod select;

pub use render::RawQuery;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = TablekitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            other => Err(TablekitError::ValidationError(format!(
                "unsupported operator `{other}`; expected one of = != < > <= >="
            ))),
        }
    }
}

/// Sort direction of an ORDER BY entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TablekitError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(TablekitError::ValidationError(format!(
                "unsupported sort direction `{s}`; expected ASC or DESC"
            )))
        }
    }
}

/// One `column <op> value` filter. All conditions of a query are joined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: RowValues,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<RowValues>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Clause accumulators of a [`TableQuery`], kept in call order.
///
/// Rendering always emits SELECT, FROM, WHERE, ORDER BY, LIMIT, OFFSET in that order no
/// matter how the builder calls were chained.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub fields: Vec<String>,
    pub conditions: Vec<Condition>,
    pub order_by: Vec<(String, Direction)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            fields: vec!["*".to_string()],
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

/// Builder for statements against one table, borrowing its [`Connection`].
///
/// Chainable calls only record clauses. Terminal calls (`get`, `first`, `count`, `insert`,
/// `update`, `delete`, `generate_fake_data`) render and execute.
///
/// Accumulated clauses are never reset: a second terminal call on the same builder renders
/// from everything recorded so far, including the `LIMIT 1` set by `first` and the projection
/// set by `count`. Start a fresh builder with [`Connection::table`] per logical operation.
///
/// ```rust,no_run
/// use sql_tablekit::prelude::*;
///
/// # fn demo() -> Result<(), TablekitError> {
/// let mut conn = Connection::new(ConnectionConfig::sqlite("app.db"))?;
/// let recent = conn
///     .table("users")
///     .where_("active", Operator::Eq, true)
///     .order_by("id", Direction::Desc)
///     .limit(10)
///     .get()?;
/// # let _ = recent;
/// # Ok(())
/// # }
/// ```
pub struct TableQuery<'conn> {
    conn: &'conn mut Connection,
    table: String,
    state: QueryState,
}

impl<'conn> TableQuery<'conn> {
    pub(crate) fn new(conn: &'conn mut Connection, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
            state: QueryState::default(),
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Replace the projection. An empty list falls back to `*`.
    pub fn select<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.state.fields = if fields.is_empty() {
            vec!["*".to_string()]
        } else {
            fields
        };
        self
    }

    /// Add a `column <op> ?` condition. Named with a trailing underscore since `where` is a
    /// keyword.
    pub fn where_(
        &mut self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<RowValues>,
    ) -> &mut Self {
        self.state
            .conditions
            .push(Condition::new(column, operator, value));
        self
    }

    /// [`TableQuery::where_`] with the operator given as text.
    ///
    /// # Errors
    /// Returns `TablekitError::ValidationError` for an operator outside `= != < > <= >=`.
    pub fn where_op(
        &mut self,
        column: impl Into<String>,
        operator: &str,
        value: impl Into<RowValues>,
    ) -> Result<&mut Self> {
        let operator = operator.parse()?;
        Ok(self.where_(column, operator, value))
    }

    /// Append already-built conditions, e.g. from [`crate::filter::parse_conditions`].
    pub fn filter(&mut self, conditions: impl IntoIterator<Item = Condition>) -> &mut Self {
        self.state.conditions.extend(conditions);
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, direction: Direction) -> &mut Self {
        self.state.order_by.push((column.into(), direction));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.state.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.state.offset = Some(offset);
        self
    }
}
