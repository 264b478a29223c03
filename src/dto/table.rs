//! Presentational column definitions for list tables.

use serde::Serialize;

use crate::domain::query::{QueryState, SortConfig, SortDir};

/// One table column: a key into the row, a header label and a cell renderer.
pub struct TableColumn<T> {
    pub key: &'static str,
    pub label: &'static str,
    pub cell: fn(&T) -> String,
}

impl<T> Clone for TableColumn<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TableColumn<T> {}

impl<T> TableColumn<T> {
    pub const fn new(key: &'static str, label: &'static str, cell: fn(&T) -> String) -> Self {
        Self { key, label, cell }
    }

    pub fn render(&self, row: &T) -> String {
        (self.cell)(row)
    }
}

/// Renders every row into its cell strings, column order preserved.
pub fn render_rows<T>(columns: &[TableColumn<T>], rows: &[T]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| columns.iter().map(|column| column.render(row)).collect())
        .collect()
}

/// Header cell with the sort state the template needs to draw arrows and links.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ColumnHeader {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Direction the column is currently sorted in, if it is the sort field.
    pub sorted: Option<SortDir>,
    /// Direction a click on the header should request.
    pub next_dir: SortDir,
}

pub fn column_headers<T>(
    columns: &[TableColumn<T>],
    sort: &SortConfig,
    query: &QueryState,
) -> Vec<ColumnHeader> {
    columns
        .iter()
        .map(|column| {
            let sortable = sort.fields.iter().any(|f| f.value == column.key);
            let sorted = (query.sort_field.as_deref() == Some(column.key)).then_some(query.sort_dir);
            ColumnHeader {
                key: column.key.to_string(),
                label: column.label.to_string(),
                sortable,
                sorted,
                next_dir: sorted.map(SortDir::reversed).unwrap_or_default(),
            }
        })
        .collect()
}
