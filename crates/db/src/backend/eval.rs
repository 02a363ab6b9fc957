//! Local evaluation of filters and ordering over JSON rows.
//!
//! Used by the in-memory backend for everything and by the HTTP backend for
//! column-to-column comparisons, which the table API cannot push down.
//!
//! Comparison follows the backend's column types as closely as JSON allows:
//! - `null` never compares, so every filter on it is false
//! - JSON numbers compare numerically, also against a numeric string
//! - two strings compare numerically only in a numeric column, where
//!   decimals are held in their string form
//! - dates and RFC 3339 timestamps compare chronologically
//! - any other text compares as text, so `"001"` and `"1"` differ

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use super::Row;
use super::query::{Filter, Operand, Order};

/// Numeric view of a JSON value.
pub fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn as_instant(value: &Value) -> Option<DateTime<Utc>> {
    let Value::String(s) = value else {
        return None;
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Orders two values, or `None` if either is null or they are incomparable.
/// `numeric` says the column holds numbers, possibly as strings.
pub fn compare(left: &Value, right: &Value, numeric: bool) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(_), Value::Number(_) | Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            Some(as_decimal(left)?.cmp(&as_decimal(right)?))
        }
        (Value::String(a), Value::String(b)) => {
            if numeric && let (Some(x), Some(y)) = (as_decimal(left), as_decimal(right)) {
                return Some(x.cmp(&y));
            }
            if let (Some(x), Some(y)) = (as_instant(left), as_instant(right)) {
                return Some(x.cmp(&y));
            }
            Some(a.cmp(b))
        }
        _ => None,
    }
}

/// Whether two values are equal under the same rules as [`compare`].
pub fn same_value(left: &Value, right: &Value, numeric: bool) -> bool {
    compare(left, right, numeric) == Some(Ordering::Equal)
}

/// Whether `row` satisfies `filter`. `numeric` lists the table's numeric
/// columns.
pub fn matches(row: &Row, filter: &Filter, numeric: &[&str]) -> bool {
    let left = row.get(&filter.column).unwrap_or(&Value::Null);
    let mut is_numeric = numeric.contains(&filter.column.as_str());
    let right = match &filter.operand {
        Operand::Value(value) => value,
        Operand::Column(column) => {
            is_numeric |= numeric.contains(&column.as_str());
            row.get(column).unwrap_or(&Value::Null)
        }
    };
    compare(left, right, is_numeric).is_some_and(|ordering| filter.op.holds(ordering))
}

/// Whether `row` satisfies every filter.
pub fn matches_all<'a>(
    row: &Row,
    filters: impl IntoIterator<Item = &'a Filter>,
    numeric: &[&str],
) -> bool {
    filters.into_iter().all(|filter| matches(row, filter, numeric))
}

/// Sorts rows by the given keys. Ascending keys put nulls last, descending
/// keys put them first. The sort is stable.
pub fn sort_rows(rows: &mut [Row], order: &[Order], numeric: &[&str]) {
    if order.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for key in order {
            let left = a.get(&key.column).unwrap_or(&Value::Null);
            let right = b.get(&key.column).unwrap_or(&Value::Null);
            let ordering = match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => compare(left, right, numeric.contains(&key.column.as_str()))
                    .unwrap_or(Ordering::Equal),
            };
            let ordering = if key.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Applies an offset/limit window.
pub fn window(rows: Vec<Row>, offset: Option<u64>, limit: Option<u64>) -> Vec<Row> {
    let skip = offset.map_or(0, |o| usize::try_from(o).unwrap_or(usize::MAX));
    let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
    rows.into_iter().skip(skip).take(take).collect()
}
