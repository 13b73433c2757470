//! Parsing of the filter and order strings a command line hands over.
//!
//! `parse_conditions("id=1,name!=ali")` and `parse_order("id DESC")` produce the values
//! [`TableQuery::filter`](crate::query_builder::TableQuery::filter) and
//! [`TableQuery::order_by`](crate::query_builder::TableQuery::order_by) take.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, TablekitError};
use crate::query_builder::{Condition, Direction, Operator};
use crate::types::RowValues;

const OPERATORS: &str = "= != < > <= >=";

// two-character operators first so `<=` is not read as `<` followed by `=value`
static CONDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s*(!=|<=|>=|=|<|>)\s*(.+)$").unwrap_or_else(|e| unreachable!("{e}"))
});

/// Parse comma-separated `column<op>value` items. Values are bound as text.
///
/// # Errors
/// Returns `TablekitError::ValidationError` naming the first malformed item.
pub fn parse_conditions(filter: &str) -> Result<Vec<Condition>> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let caps = CONDITION_RE.captures(item).ok_or_else(|| {
                TablekitError::ValidationError(format!(
                    "malformed filter `{item}`; expected column<op>value, op one of {OPERATORS}"
                ))
            })?;
            let operator: Operator = caps[2].parse()?;
            Ok(Condition::new(
                &caps[1],
                operator,
                RowValues::Text(caps[3].trim().to_string()),
            ))
        })
        .collect()
}

/// Parse `"column [ASC|DESC]"`; the direction defaults to ASC.
///
/// # Errors
/// Returns `TablekitError::ValidationError` for an empty string, extra words, or an unknown
/// direction.
pub fn parse_order(order: &str) -> Result<(String, Direction)> {
    let mut parts = order.split_whitespace();
    let column = parts.next().ok_or_else(|| {
        TablekitError::ValidationError("order string needs a column name".to_string())
    })?;
    let direction = match parts.next() {
        Some(dir) => dir.parse()?,
        None => Direction::Asc,
    };
    if let Some(extra) = parts.next() {
        return Err(TablekitError::ValidationError(format!(
            "unexpected `{extra}` in order string `{order}`"
        )));
    }
    Ok((column.to_string(), direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_operator() {
        let conditions = parse_conditions("id=1, name!=ali,age>=18,score<5").unwrap();
        let rendered: Vec<String> = conditions
            .iter()
            .map(|c| format!("{} {} {:?}", c.column, c.operator, c.value.as_text().unwrap()))
            .collect();
        assert_eq!(
            rendered,
            [
                r#"id = "1""#,
                r#"name != "ali""#,
                r#"age >= "18""#,
                r#"score < "5""#
            ]
        );
    }

    #[test]
    fn rejects_malformed_items() {
        assert!(matches!(
            parse_conditions("id=1,oops"),
            Err(TablekitError::ValidationError(_))
        ));
        assert!(parse_conditions("").unwrap().is_empty());
    }

    #[test]
    fn order_defaults_to_ascending() {
        assert_eq!(parse_order("id").unwrap(), ("id".to_string(), Direction::Asc));
        assert_eq!(
            parse_order("created_at desc").unwrap(),
            ("created_at".to_string(), Direction::Desc)
        );
        assert!(parse_order("").is_err());
        assert!(parse_order("id DESC extra").is_err());
        assert!(parse_order("id UP").is_err());
    }
}
