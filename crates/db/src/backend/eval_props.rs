//! Property-based tests for local filter and sort evaluation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::Row;
use super::eval::{as_decimal, matches, sort_rows, window};
use super::query::{Filter, FilterOp, Order};

fn stock_row(stock: i64, reorder: i64) -> Row {
    let mut row = Row::new();
    row.insert("current_stock".into(), json!(stock));
    row.insert("reorder_level".into(), json!(reorder));
    row
}

/// Stock values as the backend may return them: integers, numeric strings,
/// or null.
fn stock_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1000i64..1000).prop_map(Value::from),
        (-1000i64..1000).prop_map(|n| Value::from(n.to_string())),
        Just(Value::Null),
    ]
}

proptest! {
    #[test]
    fn prop_column_lte_matches_integer_comparison(stock in -1000i64..1000, reorder in -1000i64..1000) {
        let filter = Filter::column("current_stock", FilterOp::Lte, "reorder_level");
        prop_assert_eq!(matches(&stock_row(stock, reorder), &filter, &[]), stock <= reorder);
    }

    #[test]
    fn prop_ascending_sort_is_ordered_with_nulls_last(values in prop::collection::vec(stock_value(), 0..40)) {
        let mut rows: Vec<Row> = values
            .into_iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert("current_stock".into(), v);
                row
            })
            .collect();
        sort_rows(
            &mut rows,
            &[Order { column: "current_stock".into(), ascending: true }],
            &["current_stock"],
        );

        let keys: Vec<Option<Decimal>> = rows
            .iter()
            .map(|row| as_decimal(&row["current_stock"]))
            .collect();
        let first_null = keys.iter().position(Option::is_none).unwrap_or(keys.len());
        prop_assert!(keys[first_null..].iter().all(Option::is_none));
        prop_assert!(keys[..first_null].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_window_never_exceeds_limit(len in 0usize..50, offset in 0u64..60, limit in 0u64..60) {
        let rows: Vec<Row> = (0..len).map(|i| stock_row(i64::try_from(i).unwrap(), 0)).collect();
        let out = window(rows, Some(offset), Some(limit));
        let expected = len.saturating_sub(usize::try_from(offset).unwrap()).min(usize::try_from(limit).unwrap());
        prop_assert_eq!(out.len(), expected);
    }
}
