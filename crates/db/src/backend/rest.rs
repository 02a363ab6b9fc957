//! Hosted table API over HTTP.
//!
//! Speaks the PostgREST dialect served at `{url}/rest/v1/{table}`:
//! - filters as `column=op.value`, ordering as `order=column.asc`
//! - embeds through the `select` parameter
//! - `Prefer: return=representation` so writes return the stored rows
//! - exact counts from the `Content-Range` header of a `HEAD` request
//!
//! A column-to-column comparison has no query-string form, so those filters
//! are evaluated on the returned rows and the limit/offset window is applied
//! after them. Such reads scan the table in pages, since the hosted store
//! truncates any single response at its `max-rows` setting.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use warehouse_shared::BackendConfig;

use super::eval::{matches_all, window};
use super::query::{Filter, FilterOp, Operand, Select};
use super::schema::numeric_columns;
use super::{Row, TableBackend};
use crate::error::DataError;

/// Rows requested per page when a read is filtered locally. Matches the
/// hosted store's default `max-rows`.
const SCAN_PAGE: u64 = 1000;

/// Client for the hosted table API.
#[derive(Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    schema: Option<String>,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("base_url", &self.base_url)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<String>,
}

impl RestBackend {
    /// Builds a client that authenticates every request with the access key.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Config` if the settings are incomplete or the key
    /// cannot be sent as a header.
    pub fn new(config: &BackendConfig) -> Result<Self, DataError> {
        config.validate().map_err(DataError::Config)?;

        let key = config.access_key.trim();
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {key}"))?);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::Config(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            schema: config.schema.clone().filter(|s| !s.trim().is_empty()),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn read(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.schema {
            Some(schema) => builder.header("Accept-Profile", schema),
            None => builder,
        }
    }

    fn write(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Prefer", "return=representation");
        match &self.schema {
            Some(schema) => builder.header("Content-Profile", schema),
            None => builder,
        }
    }

    async fn rows(response: Response) -> Result<Vec<Row>, DataError> {
        let response = check(response).await?;
        response
            .json::<Vec<Row>>()
            .await
            .map_err(|e| DataError::Decode(format!("response body: {e}")))
    }
}

fn header_value(value: &str) -> Result<HeaderValue, DataError> {
    HeaderValue::from_str(value)
        .map_err(|_| DataError::Config("backend.access_key contains invalid characters".to_string()))
}

/// Passes a successful response through, or turns the error body into a
/// `DataError::Backend` carrying the backend's message.
async fn check(response: Response) -> Result<Response, DataError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(DataError::backend(status.as_u16(), message))
}

fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed.message
    {
        return Some(match parsed.details {
            Some(details) if !details.is_empty() => format!("{message} ({details})"),
            _ => message,
        });
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Query-string pair for a literal filter.
fn filter_param(filter: &Filter) -> Option<(String, String)> {
    let Operand::Value(value) = &filter.operand else {
        return None;
    };
    let rendered = match (filter.op, value) {
        (FilterOp::Eq, Value::Null) => "is.null".to_string(),
        (FilterOp::Neq, Value::Null) => "not.is.null".to_string(),
        (op, value) => format!("{}.{}", op.as_str(), literal(value)),
    };
    Some((filter.column.clone(), rendered))
}

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().filter_map(filter_param).collect()
}

/// Columns that a locally evaluated comparison needs but the selection
/// leaves out.
fn missing_compared_columns(query: &Select) -> Vec<String> {
    if query.columns.is_empty() {
        return Vec::new();
    }
    let mut extra: Vec<String> = Vec::new();
    for filter in query.filters.iter().filter(|f| f.is_column_comparison()) {
        let Operand::Column(other) = &filter.operand else {
            continue;
        };
        for column in [&filter.column, other] {
            if !query.columns.contains(column) && !extra.contains(column) {
                extra.push(column.clone());
            }
        }
    }
    extra
}

/// Query string for a select. The window is only pushed down when every
/// filter is. A locally filtered read is ordered by `id` last so its pages
/// do not overlap.
fn select_params(query: &Select, extra_columns: &[String]) -> Vec<(String, String)> {
    let mut widened = query.clone();
    widened.columns.extend(extra_columns.iter().cloned());

    let mut params = vec![("select".to_string(), widened.select_clause())];
    params.extend(filter_params(&query.filters));

    let mut order: Vec<String> = query
        .order
        .iter()
        .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
        .collect();
    if query.has_column_comparison() && !query.order.iter().any(|o| o.column == "id") {
        order.push("id.asc".to_string());
    }
    if !order.is_empty() {
        params.push(("order".to_string(), order.join(",")));
    }

    if !query.has_column_comparison() {
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = query.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
    }
    params
}

/// `params` with the window of the scan page starting at `offset`.
fn scan_page_params(params: &[(String, String)], offset: u64) -> Vec<(String, String)> {
    let mut page = params.to_vec();
    page.push(("limit".to_string(), SCAN_PAGE.to_string()));
    page.push(("offset".to_string(), offset.to_string()));
    page
}

/// Offset of the next scan page, or `None` once a short page shows the
/// table is exhausted.
fn next_scan_offset(offset: u64, fetched: usize) -> Option<u64> {
    let fetched = u64::try_from(fetched).unwrap_or(u64::MAX);
    (fetched >= SCAN_PAGE).then(|| offset.saturating_add(SCAN_PAGE))
}

/// Total from a `Content-Range` value such as `0-24/3573` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/').and_then(|(_, total)| total.trim().parse().ok())
}

fn reject_column_comparisons(filters: &[Filter]) -> Result<(), DataError> {
    if filters.iter().any(Filter::is_column_comparison) {
        return Err(DataError::backend(
            400,
            "column-to-column comparisons are only supported in reads",
        ));
    }
    Ok(())
}

#[async_trait]
impl TableBackend for RestBackend {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, DataError> {
        let extra = missing_compared_columns(query);
        let params = select_params(query, &extra);
        debug!(table = %query.table, ?params, "select");

        if !query.has_column_comparison() {
            let request = self.read(self.http.get(self.table_url(&query.table)).query(&params));
            return Self::rows(request.send().await?).await;
        }

        let comparisons: Vec<&Filter> = query
            .filters
            .iter()
            .filter(|f| f.is_column_comparison())
            .collect();
        let numeric = numeric_columns(&query.table);

        let mut kept: Vec<Row> = Vec::new();
        let mut offset = 0;
        loop {
            let page = scan_page_params(&params, offset);
            let request = self.read(self.http.get(self.table_url(&query.table)).query(&page));
            let rows = Self::rows(request.send().await?).await?;
            let fetched = rows.len();

            kept.extend(
                rows.into_iter()
                    .filter(|row| matches_all(row, comparisons.iter().copied(), numeric))
                    .map(|mut row| {
                        for column in &extra {
                            row.remove(column);
                        }
                        row
                    }),
            );

            match next_scan_offset(offset, fetched) {
                Some(next) => offset = next,
                None => break,
            }
        }
        debug!(table = %query.table, rows = kept.len(), "locally filtered select");
        Ok(window(kept, query.offset, query.limit))
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, DataError> {
        if filters.iter().any(Filter::is_column_comparison) {
            let query = Select {
                filters: filters.to_vec(),
                ..Select::table(table)
            };
            let rows = self.select(&query).await?;
            return Ok(u64::try_from(rows.len()).unwrap_or(u64::MAX));
        }

        let mut params = vec![("select".to_string(), "id".to_string())];
        params.extend(filter_params(filters));
        debug!(table, ?params, "count");

        let request = self
            .read(self.http.head(self.table_url(table)).query(&params))
            .header("Prefer", "count=exact");
        let response = check(request.send().await?).await?;

        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| DataError::Decode("missing or malformed Content-Range header".to_string()))
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, DataError> {
        debug!(table, "insert");
        let request = self.write(self.http.post(self.table_url(table)).json(&row));
        Self::rows(request.send().await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DataError::Decode(format!("insert into {table} returned no row")))
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>, DataError> {
        reject_column_comparisons(filters)?;
        let params = filter_params(filters);
        debug!(table, ?params, "update");

        let request = self.write(
            self.http
                .patch(self.table_url(table))
                .query(&params)
                .json(&patch),
        );
        Self::rows(request.send().await?).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, DataError> {
        reject_column_comparisons(filters)?;
        let params = filter_params(filters);
        debug!(table, ?params, "delete");

        let request = self.write(self.http.delete(self.table_url(table)).query(&params));
        Self::rows(request.send().await?).await
    }
}
