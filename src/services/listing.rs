//! Loading list pages for the dashboard and the JSON API.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::domain::query::{ALL, FilterKind, FilterOption, ViewSchema};
use crate::dto::listing::{FilterView, ListPageData, ListRow, row_id};
use crate::dto::table::{column_headers, render_rows};
use crate::engine::{DataView, DataViewEngine};
use crate::pagination::Pager;
use crate::params::QueryParamStore;
use crate::providers::Listing;
use crate::refresh::RefreshBridge;

/// Builds an engine for `L` over the given URL query.
pub fn build_engine<L, A>(api: Arc<A>, query_string: &str) -> DataViewEngine<L>
where
    A: ApiClient + 'static,
    L: Listing<A>,
{
    let store = Arc::new(QueryParamStore::new(query_string));
    DataViewEngine::new(L::new(api, store.clone()), store)
}

/// Runs one fetch cycle and returns the resulting view.
pub async fn load_view<L, A>(api: Arc<A>, query_string: &str, bridge: &RefreshBridge) -> DataView<L::Row>
where
    A: ApiClient + 'static,
    L: Listing<A>,
{
    let engine = build_engine::<L, A>(api, query_string);
    engine.load().await;

    let mut view = engine.snapshot();
    view.refresh_key = bridge.key();
    view
}

/// Loads everything the server-rendered list page needs.
pub async fn load_list_page<L, A>(
    api: Arc<A>,
    query_string: &str,
    bridge: &RefreshBridge,
) -> ListPageData
where
    A: ApiClient + 'static,
    L: Listing<A>,
{
    let engine = build_engine::<L, A>(api, query_string);
    engine.load().await;
    let view = engine.snapshot();

    let kind = L::KIND;
    let schema = engine.provider().schema();
    let columns = L::columns();

    let rows = view
        .rows
        .iter()
        .zip(render_rows(&columns, &view.rows))
        .map(|(row, cells)| ListRow {
            id: serde_json::to_value(row).ok().as_ref().and_then(row_id),
            cells,
        })
        .collect();

    ListPageData {
        kind,
        name: kind.name(),
        title: kind.title(),
        headers: column_headers(&columns, &schema.sort, &view.query),
        rows,
        filters: FilterView::from_schema(schema, &view.query),
        sorts: schema.sort.fields.clone(),
        search: view.query.search.clone(),
        pager: Pager::new(view.page, view.total_count, view.limit),
        total_count: view.total_count,
        limit: view.limit,
        error: view.error,
        refresh_key: bridge.key(),
        query_string: engine.store().query_string(),
        status_options: status_options(schema),
    }
}

/// Options of the `status` select filter without the "all" sentinel.
pub fn status_options(schema: &ViewSchema) -> Vec<FilterOption> {
    match schema.filter("status").map(|filter| &filter.kind) {
        Some(FilterKind::Select { options, .. }) => options
            .iter()
            .filter(|option| option.value != ALL)
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ListingKind;

    #[test]
    fn status_options_skip_the_sentinel() {
        let options = status_options(&ListingKind::Clients.schema());

        assert!(!options.is_empty());
        assert!(options.iter().all(|option| option.value != ALL));
    }

    #[test]
    fn lists_without_status_have_no_options() {
        let schema = ViewSchema::default();

        assert!(status_options(&schema).is_empty());
    }
}
