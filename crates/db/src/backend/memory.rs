//! In-process table store.
//!
//! Behaves like the hosted store for everything the repositories rely on:
//! generated ids and timestamps, column defaults, unique and foreign-key
//! checks, computed totals, and embedded related rows. Nothing is persisted.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::eval::{matches_all, same_value, sort_rows, window};
use super::query::{Embed, Filter, Select};
use super::schema::{self, TableSpec};
use super::{Row, TableBackend};
use crate::error::DataError;

type Tables = HashMap<&'static str, Vec<Row>>;

/// Table store held in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
}

impl MemoryBackend {
    /// Creates an empty store with every known table.
    #[must_use]
    pub fn new() -> Self {
        let tables = schema::tables().map(|spec| (spec.name, Vec::new())).collect();
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Snapshot of every row in `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn spec_for(table: &str) -> Result<&'static TableSpec, DataError> {
    schema::table(table).ok_or_else(|| {
        DataError::backend(404, format!("relation \"public.{table}\" does not exist"))
    })
}

fn now() -> Value {
    Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false))
}

fn same_id(row: &Row, id: &Value) -> bool {
    row.get("id").is_some_and(|value| value == id)
}

fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .map(|column| {
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            (column.clone(), value)
        })
        .collect()
}

/// Attaches `embed` to `row`: an object (or null) when `parent` references
/// the embedded table, an array when the embedded table references `parent`.
fn attach(tables: &Tables, parent: &'static TableSpec, row: &mut Row, embed: &Embed) -> Result<(), DataError> {
    let target = spec_for(&embed.table)?;
    let related = tables.get(target.name).map(Vec::as_slice).unwrap_or_default();

    let value = if let Some(column) = parent.reference_to(target.name) {
        match row.get(column).filter(|v| !v.is_null()) {
            Some(key) => match related.iter().find(|r| same_id(r, key)) {
                Some(found) => Value::Object(shape(tables, target, found, &embed.columns, &embed.nested)?),
                None => Value::Null,
            },
            None => Value::Null,
        }
    } else if let Some(column) = target.reference_to(parent.name) {
        let id = row.get("id").cloned().unwrap_or(Value::Null);
        let children = related
            .iter()
            .filter(|r| r.get(column).is_some_and(|v| *v == id))
            .map(|r| shape(tables, target, r, &embed.columns, &embed.nested).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        Value::Array(children)
    } else {
        return Err(DataError::backend(
            400,
            format!(
                "Could not find a relationship between '{}' and '{}'",
                parent.name, target.name
            ),
        ));
    };

    row.insert(embed.table.clone(), value);
    Ok(())
}

fn shape(
    tables: &Tables,
    spec: &'static TableSpec,
    row: &Row,
    columns: &[String],
    embeds: &[Embed],
) -> Result<Row, DataError> {
    let mut out = project(row, columns);
    for embed in embeds {
        attach(tables, spec, &mut out, embed)?;
    }
    Ok(out)
}

/// Rejects a row that would break a unique or foreign-key rule. `skip` is
/// the index of the row being replaced, if any.
fn check_constraints(tables: &Tables, spec: &TableSpec, row: &Row, skip: Option<usize>) -> Result<(), DataError> {
    let existing = tables.get(spec.name).map(Vec::as_slice).unwrap_or_default();

    for column in spec.unique {
        let Some(value) = row.get(*column).filter(|v| !v.is_null()) else {
            continue;
        };
        let numeric = spec.numeric.contains(column);
        let clash = existing.iter().enumerate().any(|(i, other)| {
            Some(i) != skip
                && other
                    .get(*column)
                    .is_some_and(|stored| same_value(stored, value, numeric))
        });
        if clash {
            return Err(DataError::backend(
                409,
                format!(
                    "duplicate key value violates unique constraint \"{}_{}_key\"",
                    spec.name, column
                ),
            ));
        }
    }

    for (column, target) in spec.references {
        let Some(key) = row.get(*column).filter(|v| !v.is_null()) else {
            continue;
        };
        let present = tables
            .get(target)
            .is_some_and(|rows| rows.iter().any(|r| same_id(r, key)));
        if !present {
            return Err(DataError::backend(
                409,
                format!(
                    "insert or update on table \"{}\" violates foreign key constraint \"{}_{}_fkey\"",
                    spec.name, spec.name, column
                ),
            ));
        }
    }

    Ok(())
}

fn matching_indices(spec: &TableSpec, rows: &[Row], filters: &[Filter]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches_all(row, filters, spec.numeric))
        .map(|(i, _)| i)
        .collect()
}

#[async_trait]
impl TableBackend for MemoryBackend {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, DataError> {
        let spec = spec_for(&query.table)?;
        let tables = self.tables.read().await;
        let rows = tables.get(spec.name).map(Vec::as_slice).unwrap_or_default();

        let mut selected: Vec<Row> = rows
            .iter()
            .filter(|row| matches_all(row, &query.filters, spec.numeric))
            .cloned()
            .collect();
        sort_rows(&mut selected, &query.order, spec.numeric);
        let selected = window(selected, query.offset, query.limit);

        debug!(table = %query.table, rows = selected.len(), "memory select");
        selected
            .iter()
            .map(|row| shape(&tables, spec, row, &query.columns, &query.embeds))
            .collect()
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, DataError> {
        let spec = spec_for(table)?;
        let tables = self.tables.read().await;
        let rows = tables.get(spec.name).map(Vec::as_slice).unwrap_or_default();
        let count = rows
            .iter()
            .filter(|row| matches_all(row, filters, spec.numeric))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, DataError> {
        let spec = spec_for(table)?;
        let mut tables = self.tables.write().await;

        if row.get("id").is_none_or(Value::is_null) {
            row.insert("id".into(), Value::from(Uuid::new_v4().to_string()));
        }
        let stamp = now();
        if row.get("created_at").is_none_or(Value::is_null) {
            row.insert("created_at".into(), stamp.clone());
        }
        if spec.has_updated_at && row.get("updated_at").is_none_or(Value::is_null) {
            row.insert("updated_at".into(), stamp);
        }
        spec.apply_defaults(&mut row);
        if let Some(column) = spec.missing_required(&row) {
            return Err(DataError::backend(
                400,
                format!("null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"),
            ));
        }
        if let Some(compute) = spec.computed {
            compute(&mut row);
        }

        let id = row.get("id").cloned().unwrap_or(Value::Null);
        let duplicate_id = tables
            .get(spec.name)
            .is_some_and(|rows| rows.iter().any(|r| same_id(r, &id)));
        if duplicate_id {
            return Err(DataError::backend(
                409,
                format!("duplicate key value violates unique constraint \"{table}_pkey\""),
            ));
        }
        check_constraints(&tables, spec, &row, None)?;

        debug!(table, "memory insert");
        tables.entry(spec.name).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>, DataError> {
        let spec = spec_for(table)?;
        let mut tables = self.tables.write().await;
        let rows = tables.get(spec.name).map(Vec::as_slice).unwrap_or_default();
        let targets = matching_indices(spec, rows, filters);

        let mut staged = Vec::with_capacity(targets.len());
        for &index in &targets {
            let mut next = rows[index].clone();
            for (column, value) in &patch {
                next.insert(column.clone(), value.clone());
            }
            if spec.has_updated_at {
                next.insert("updated_at".into(), now());
            }
            if let Some(column) = spec.missing_required(&next) {
                return Err(DataError::backend(
                    400,
                    format!("null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"),
                ));
            }
            if let Some(compute) = spec.computed {
                compute(&mut next);
            }
            check_constraints(&tables, spec, &next, Some(index))?;
            staged.push((index, next));
        }

        debug!(table, rows = staged.len(), "memory update");
        let rows = tables.entry(spec.name).or_default();
        let mut updated = Vec::with_capacity(staged.len());
        for (index, next) in staged {
            rows[index] = next.clone();
            updated.push(next);
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, DataError> {
        let spec = spec_for(table)?;
        let mut tables = self.tables.write().await;
        let rows = tables.get(spec.name).map(Vec::as_slice).unwrap_or_default();
        let targets = matching_indices(spec, rows, filters);

        for &index in &targets {
            let id = rows[index].get("id").cloned().unwrap_or(Value::Null);
            for referencing in schema::tables() {
                let Some(column) = referencing.reference_to(spec.name) else {
                    continue;
                };
                let in_use = tables.get(referencing.name).is_some_and(|others| {
                    others
                        .iter()
                        .any(|r| r.get(column).is_some_and(|v| *v == id))
                });
                if in_use {
                    return Err(DataError::backend(
                        409,
                        format!(
                            "update or delete on table \"{}\" violates foreign key constraint \"{}_{}_fkey\" on table \"{}\"",
                            spec.name, referencing.name, column, referencing.name
                        ),
                    ));
                }
            }
        }

        debug!(table, rows = targets.len(), "memory delete");
        let rows = tables.entry(spec.name).or_default();
        let mut removed = Vec::with_capacity(targets.len());
        for index in targets.into_iter().rev() {
            removed.push(rows.remove(index));
        }
        removed.reverse();
        Ok(removed)
    }
}
