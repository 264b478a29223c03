//! Data passed from the listing services to templates and the JSON API.

use serde::Serialize;
use serde_json::Value;

use crate::domain::query::{FilterKind, FilterOption, QueryState, SortOption, ViewSchema};
use crate::dto::table::ColumnHeader;
use crate::pagination::Pager;
use crate::providers::ListingKind;

/// A filter control with its current value.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterView {
    pub key: String,
    pub label: String,
    pub kind: FilterKind,
    pub selected: Option<String>,
    /// Start of a date range as `YYYY-MM-DD`.
    pub from: Option<String>,
    pub to: Option<String>,
}

impl FilterView {
    pub fn from_schema(schema: &ViewSchema, query: &QueryState) -> Vec<FilterView> {
        schema
            .filters
            .iter()
            .map(|filter| {
                let range = query.date_ranges.get(&filter.key);
                FilterView {
                    key: filter.key.clone(),
                    label: filter.label.clone(),
                    kind: filter.kind.clone(),
                    selected: query.filters.get(&filter.key).cloned(),
                    from: range.and_then(|r| r.from).map(|d| d.to_string()),
                    to: range.and_then(|r| r.to).map(|d| d.to_string()),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListRow {
    pub id: Option<String>,
    pub cells: Vec<String>,
}

/// Everything `listing/index.html` renders.
#[derive(Debug, Clone, Serialize)]
pub struct ListPageData {
    pub kind: ListingKind,
    pub name: &'static str,
    pub title: &'static str,
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<ListRow>,
    pub filters: Vec<FilterView>,
    pub sorts: Vec<SortOption>,
    pub search: Option<String>,
    pub pager: Pager,
    pub total_count: usize,
    pub limit: usize,
    pub error: Option<String>,
    pub refresh_key: u64,
    /// Current URL query, used to keep state across actions.
    pub query_string: String,
    /// Values a row status can be switched to; empty for lists without status.
    pub status_options: Vec<FilterOption>,
}

/// Identifier of a serialized row, if the row has an `id` field.
pub fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
