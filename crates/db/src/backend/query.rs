//! Backend-neutral query model.
//!
//! A `Select` mirrors what the table API can express: column and embed
//! selection, filters, ordering, and a limit/offset window. Filters compare a
//! column either with a literal or with another column of the same row.

use serde_json::Value;
use warehouse_shared::types::PageRequest;

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Eq,
    /// `<>`
    Neq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl FilterOp {
    /// Operator name in the table API's query syntax.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    /// Whether `left op right` holds given how `left` compares to `right`.
    #[must_use]
    pub const fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            Self::Eq => matches!(ordering, Equal),
            Self::Neq => !matches!(ordering, Equal),
            Self::Gt => matches!(ordering, Greater),
            Self::Gte => matches!(ordering, Greater | Equal),
            Self::Lt => matches!(ordering, Less),
            Self::Lte => matches!(ordering, Less | Equal),
        }
    }
}

/// Right-hand side of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal value.
    Value(Value),
    /// Another column of the same row.
    Column(String),
}

/// One `column op operand` condition. Conditions in a query are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column on the left-hand side.
    pub column: String,
    /// Operator.
    pub op: FilterOp,
    /// Right-hand side.
    pub operand: Operand,
}

impl Filter {
    /// Compares a column with a literal.
    pub fn value(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            operand: Operand::Value(value.into()),
        }
    }

    /// Compares a column with another column of the same row.
    pub fn column(column: impl Into<String>, op: FilterOp, other: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            operand: Operand::Column(other.into()),
        }
    }

    /// `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::value(column, FilterOp::Eq, value)
    }

    /// `column >= value`.
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::value(column, FilterOp::Gte, value)
    }

    /// Whether the right-hand side is another column.
    #[must_use]
    pub const fn is_column_comparison(&self) -> bool {
        matches!(self.operand, Operand::Column(_))
    }
}

/// Sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Column to sort by.
    pub column: String,
    /// Ascending (nulls last) or descending (nulls first).
    pub ascending: bool,
}

/// Related rows to embed in each result row, keyed by the related table's
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Related table.
    pub table: String,
    /// Columns to include; empty means all.
    pub columns: Vec<String>,
    /// Embeds inside the related rows.
    pub nested: Vec<Self>,
}

impl Embed {
    /// Embeds the named columns of a related table.
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(ToString::to_string).collect(),
            nested: Vec::new(),
        }
    }

    /// Embeds every column of a related table.
    pub fn all(table: impl Into<String>) -> Self {
        Self::new(table, &[])
    }

    /// Adds an embed inside this one.
    #[must_use]
    pub fn with(mut self, nested: Self) -> Self {
        self.nested.push(nested);
        self
    }

    /// Selection clause in the table API's syntax, e.g.
    /// `repair_components(*,components(name,sku))`.
    #[must_use]
    pub fn select_clause(&self) -> String {
        format!("{}({})", self.table, select_list(&self.columns, &self.nested))
    }
}

fn select_list(columns: &[String], embeds: &[Embed]) -> String {
    let mut parts: Vec<String> = if columns.is_empty() {
        vec!["*".to_string()]
    } else {
        columns.to_vec()
    };
    parts.extend(embeds.iter().map(Embed::select_clause));
    parts.join(",")
}

/// A read against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Table to read.
    pub table: String,
    /// Columns to return; empty means all.
    pub columns: Vec<String>,
    /// Related rows to embed.
    pub embeds: Vec<Embed>,
    /// Conditions, ANDed.
    pub filters: Vec<Filter>,
    /// Sort keys, most significant first.
    pub order: Vec<Order>,
    /// Maximum rows.
    pub limit: Option<u64>,
    /// Rows to skip.
    pub offset: Option<u64>,
}

impl Select {
    /// Reads all columns of `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            embeds: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Restricts the returned columns.
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(ToString::to_string).collect();
        self
    }

    /// Adds an embed.
    #[must_use]
    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Adds a condition.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a condition when `value` is present.
    #[must_use]
    pub fn filter_opt<T>(self, column: &str, value: Option<T>) -> Self
    where
        T: Into<Value>,
    {
        match value {
            Some(value) => self.filter(Filter::eq(column, value)),
            None => self,
        }
    }

    /// Adds a sort key.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Limits the result to at most `limit` rows.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Applies a page window.
    #[must_use]
    pub fn page(mut self, page: &PageRequest) -> Self {
        let page = PageRequest::new(page.page, page.per_page);
        self.limit = Some(page.limit());
        self.offset = Some(page.offset());
        self
    }

    /// Selection clause in the table API's syntax, e.g.
    /// `*,companies(name,contact_person)`.
    #[must_use]
    pub fn select_clause(&self) -> String {
        select_list(&self.columns, &self.embeds)
    }

    /// Whether any filter compares two columns.
    #[must_use]
    pub fn has_column_comparison(&self) -> bool {
        self.filters.iter().any(Filter::is_column_comparison)
    }
}
