//! CSV export of the rows a list currently shows.
//!
//! The export reuses the list engine: a data-update callback captures exactly
//! the rows and query that were applied, so the file matches the screen.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::ApiClient;
use crate::domain::query::QueryState;
use crate::providers::Listing;
use crate::services::listing::build_engine;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: Vec<u8>,
}

pub async fn export_csv<L, A>(api: Arc<A>, query_string: &str) -> ServiceResult<CsvExport>
where
    A: ApiClient + 'static,
    L: Listing<A>,
{
    let captured: Arc<Mutex<Option<(Vec<L::Row>, QueryState)>>> = Arc::new(Mutex::new(None));
    let sink = captured.clone();
    let engine = build_engine::<L, A>(api, query_string).with_data_update(move |rows, query| {
        *sink.lock() = Some((rows.to_vec(), query.clone()));
    });

    engine.load().await;
    if let Some(err) = engine.view_state().error {
        return Err(ServiceError::Provider(err));
    }

    let Some((rows, query)) = captured.lock().take() else {
        return Err(ServiceError::NotFound);
    };

    let columns = L::columns();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.iter().map(|column| column.label))?;
    for row in &rows {
        writer.write_record(columns.iter().map(|column| column.render(row)))?;
    }
    let content = writer
        .into_inner()
        .map_err(|err| ServiceError::Csv(err.into_error().into()))?;

    Ok(CsvExport {
        file_name: file_name(L::KIND.name(), &query),
        content,
    })
}

/// `<list>[_<filter>-<value>...].csv`, from the filters that narrowed the rows.
pub fn file_name(list: &str, query: &QueryState) -> String {
    let mut parts = vec![list.to_string()];
    for key in query.active_filter_keys() {
        let value = match query.date_ranges.get(key) {
            Some(range) => [range.from, range.to]
                .iter()
                .map(|date| date.map(|d| d.to_string()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("-"),
            None => query.filters.get(key).cloned().unwrap_or_default(),
        };
        parts.push(format!("{key}-{value}"));
    }
    if let Some(search) = &query.search {
        parts.push(format!("search-{search}"));
    }

    let name: String = parts
        .join("_")
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("{name}.csv")
}
