//! Table names and the column rules the hosted store enforces.
//!
//! The HTTP backend only needs the names. The in-memory backend also uses the
//! rules so it generates, rejects, and computes the same things the real
//! store does.

use rust_decimal::Decimal;
use serde_json::Value;

use super::Row;
use super::eval::as_decimal;

/// `companies`
pub const COMPANIES: &str = "companies";
/// `returns`
pub const RETURNS: &str = "returns";
/// `repairs`
pub const REPAIRS: &str = "repairs";
/// `repair_components`
pub const REPAIR_COMPONENTS: &str = "repair_components";
/// `shipments`
pub const SHIPMENTS: &str = "shipments";
/// `components`
pub const COMPONENTS: &str = "components";
/// `stock_movements`
pub const STOCK_MOVEMENTS: &str = "stock_movements";
/// `budget_entries`
pub const BUDGET_ENTRIES: &str = "budget_entries";

/// Default applied to a column the insert payload leaves out.
#[derive(Debug, Clone, Copy)]
pub enum ColumnDefault {
    /// Integer literal.
    Int(i64),
    /// Numeric literal, stored in its string form.
    Amount(&'static str),
    /// Text or enum literal.
    Text(&'static str),
}

impl ColumnDefault {
    fn to_value(self) -> Value {
        match self {
            Self::Int(n) => Value::from(n),
            Self::Amount(s) | Self::Text(s) => Value::from(s),
        }
    }
}

/// Column rules of one table.
#[derive(Debug)]
pub struct TableSpec {
    /// Table name.
    pub name: &'static str,
    /// Whether the table carries an `updated_at` column.
    pub has_updated_at: bool,
    /// Columns that must be present and non-null on insert.
    pub required: &'static [&'static str],
    /// Column defaults.
    pub defaults: &'static [(&'static str, ColumnDefault)],
    /// Numeric columns. Decimals among them are held as strings.
    pub numeric: &'static [&'static str],
    /// Columns whose non-null values must be unique.
    pub unique: &'static [&'static str],
    /// `(column, referenced table)` foreign keys onto the referenced `id`.
    pub references: &'static [(&'static str, &'static str)],
    /// Generated columns, recomputed on every write.
    pub computed: Option<fn(&mut Row)>,
}

impl TableSpec {
    /// Fills in defaults for columns the row does not carry. An explicit
    /// null is kept.
    pub fn apply_defaults(&self, row: &mut Row) {
        for (column, default) in self.defaults {
            if !row.contains_key(*column) {
                row.insert((*column).to_string(), default.to_value());
            }
        }
    }

    /// First required column that is missing or null.
    pub fn missing_required(&self, row: &Row) -> Option<&'static str> {
        self.required
            .iter()
            .copied()
            .find(|column| row.get(*column).is_none_or(Value::is_null))
    }

    /// Column referencing `table`, if any.
    pub fn reference_to(&self, table: &str) -> Option<&'static str> {
        self.references
            .iter()
            .find(|(_, target)| *target == table)
            .map(|(column, _)| *column)
    }
}

fn amount(row: &Row, column: &str) -> Decimal {
    row.get(column).and_then(as_decimal).unwrap_or_default()
}

fn repair_total(row: &mut Row) {
    let total = amount(row, "labor_cost") + amount(row, "parts_cost");
    row.insert("total_cost".into(), Value::from(total.to_string()));
}

fn repair_component_total(row: &mut Row) {
    let total = amount(row, "quantity_used") * amount(row, "cost_per_unit");
    row.insert("total_cost".into(), Value::from(total.to_string()));
}

static TABLES: &[TableSpec] = &[
    TableSpec {
        name: COMPANIES,
        has_updated_at: true,
        required: &["name"],
        defaults: &[],
        numeric: &[],
        unique: &[],
        references: &[],
        computed: None,
    },
    TableSpec {
        name: RETURNS,
        has_updated_at: true,
        required: &["return_id", "return_date"],
        defaults: &[
            ("status", ColumnDefault::Text("pending")),
            ("total_items", ColumnDefault::Int(0)),
            ("total_value", ColumnDefault::Amount("0")),
        ],
        numeric: &["total_items", "total_value"],
        unique: &["return_id"],
        references: &[("company_id", COMPANIES)],
        computed: None,
    },
    TableSpec {
        name: REPAIRS,
        has_updated_at: true,
        required: &["repair_id", "issue_description"],
        defaults: &[
            ("status", ColumnDefault::Text("pending")),
            ("priority", ColumnDefault::Text("medium")),
            ("labor_cost", ColumnDefault::Amount("0")),
            ("parts_cost", ColumnDefault::Amount("0")),
        ],
        numeric: &["labor_cost", "parts_cost", "total_cost"],
        unique: &["repair_id"],
        references: &[],
        computed: Some(repair_total),
    },
    TableSpec {
        name: REPAIR_COMPONENTS,
        has_updated_at: false,
        required: &["quantity_needed"],
        defaults: &[
            ("quantity_needed", ColumnDefault::Int(1)),
            ("quantity_used", ColumnDefault::Int(0)),
            ("cost_per_unit", ColumnDefault::Amount("0")),
        ],
        numeric: &["quantity_needed", "quantity_used", "cost_per_unit", "total_cost"],
        unique: &[],
        references: &[("repair_id", REPAIRS), ("component_id", COMPONENTS)],
        computed: Some(repair_component_total),
    },
    TableSpec {
        name: SHIPMENTS,
        has_updated_at: true,
        required: &["shipment_id", "type"],
        defaults: &[
            ("status", ColumnDefault::Text("pending")),
            ("total_units", ColumnDefault::Int(0)),
        ],
        numeric: &["total_units", "weight_kg"],
        unique: &["shipment_id"],
        references: &[],
        computed: None,
    },
    TableSpec {
        name: COMPONENTS,
        has_updated_at: true,
        required: &["name", "sku"],
        defaults: &[
            ("unit_cost", ColumnDefault::Amount("0")),
            ("minimum_stock", ColumnDefault::Int(0)),
            ("current_stock", ColumnDefault::Int(0)),
            ("reorder_level", ColumnDefault::Int(0)),
        ],
        numeric: &["unit_cost", "minimum_stock", "current_stock", "reorder_level"],
        unique: &["sku"],
        references: &[],
        computed: None,
    },
    TableSpec {
        name: STOCK_MOVEMENTS,
        has_updated_at: false,
        required: &["movement_type", "quantity"],
        defaults: &[],
        numeric: &["quantity"],
        unique: &[],
        references: &[("component_id", COMPONENTS)],
        computed: None,
    },
    TableSpec {
        name: BUDGET_ENTRIES,
        has_updated_at: true,
        required: &["week_start", "week_end", "category", "budgeted_amount"],
        defaults: &[("actual_amount", ColumnDefault::Amount("0"))],
        numeric: &["budgeted_amount", "actual_amount"],
        unique: &[],
        references: &[],
        computed: None,
    },
];

/// Rules for `table`, if it exists.
pub fn table(name: &str) -> Option<&'static TableSpec> {
    TABLES.iter().find(|spec| spec.name == name)
}

/// Numeric columns of `table`; none for an unknown table.
pub fn numeric_columns(table: &str) -> &'static [&'static str] {
    self::table(table).map(|spec| spec.numeric).unwrap_or_default()
}

/// Every known table.
pub fn tables() -> impl Iterator<Item = &'static TableSpec> {
    TABLES.iter()
}
