//! Data-view engine: drives one list instance.
//!
//! The engine turns URL state changes and refresh bumps into provider calls
//! and keeps the displayed state consistent. Every load is tagged with a
//! generation number; only the newest generation may write rows, so a slow
//! response can never overwrite a newer one. Starting a load cancels the one
//! still in flight.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::domain::query::{
    ALL, DIR_KEY, DateRange, FROM_SUFFIX, LIMIT_KEY, PAGE_KEY, QueryState, SEARCH_KEY, SORT_KEY,
    SortDir, TO_SUFFIX,
};
use crate::params::QueryParamStore;
use crate::providers::{ProviderError, RowProvider};
use crate::refresh::RefreshKey;

type DataUpdateCallback<T> = Box<dyn Fn(&[T], &QueryState) + Send + Sync>;

/// Displayed state of a list.
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    pub rows: Vec<T>,
    pub total_count: usize,
    pub loading: bool,
    pub error: Option<ProviderError>,
    pub generation: u64,
    pub refresh_key: u64,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
            loading: false,
            error: None,
            generation: 0,
            refresh_key: 0,
        }
    }
}

/// Whether a finished load was written to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load started, or the engine shut down, before this one finished.
    Stale,
}

/// Read-only copy of the view handed to renderers and the JSON API.
#[derive(Debug, Clone, Serialize)]
pub struct DataView<T> {
    pub rows: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub limit: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub query: QueryState,
    pub refresh_key: u64,
}

struct EngineState<T> {
    view: ViewState<T>,
    in_flight: Option<CancellationToken>,
}

pub struct DataViewEngine<P: RowProvider> {
    provider: P,
    store: Arc<QueryParamStore>,
    state: Mutex<EngineState<P::Row>>,
    shutdown: CancellationToken,
    on_data_update: Option<DataUpdateCallback<P::Row>>,
}

impl<P: RowProvider> DataViewEngine<P> {
    pub fn new(provider: P, store: Arc<QueryParamStore>) -> Self {
        Self {
            provider,
            store,
            state: Mutex::new(EngineState {
                view: ViewState::default(),
                in_flight: None,
            }),
            shutdown: CancellationToken::new(),
            on_data_update: None,
        }
    }

    /// Registers a callback invoked with the displayed rows and the active
    /// query after every applied load.
    pub fn with_data_update(
        mut self,
        callback: impl Fn(&[P::Row], &QueryState) + Send + Sync + 'static,
    ) -> Self {
        self.on_data_update = Some(Box::new(callback));
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &Arc<QueryParamStore> {
        &self.store
    }

    pub fn query(&self) -> QueryState {
        QueryState::read(&self.store, self.provider.schema())
    }

    pub fn view_state(&self) -> ViewState<P::Row> {
        self.state.lock().view.clone()
    }

    /// Runs one fetch cycle for the current URL state.
    pub async fn load(&self) -> LoadOutcome {
        let query = self.query();
        let (generation, token) = {
            let mut state = self.state.lock();
            state.view.generation += 1;
            state.view.loading = true;
            let token = self.shutdown.child_token();
            if let Some(previous) = state.in_flight.replace(token.clone()) {
                previous.cancel();
            }
            (state.view.generation, token)
        };

        let result = self.provider.get_rows(token.clone()).await;

        let rows = {
            let mut state = self.state.lock();
            if state.view.generation != generation {
                log::debug!(
                    "Discarding stale result of generation {generation}, current is {}",
                    state.view.generation
                );
                return LoadOutcome::Stale;
            }
            state.in_flight = None;
            state.view.loading = false;
            if token.is_cancelled() {
                log::debug!("Load of generation {generation} cancelled");
                return LoadOutcome::Stale;
            }

            state.view.total_count = result.total_count.unwrap_or(result.rows.len());
            state.view.rows = result.rows;
            state.view.error = result.error;
            self.on_data_update
                .as_ref()
                .map(|_| state.view.rows.clone())
        };

        if let (Some(callback), Some(rows)) = (&self.on_data_update, rows) {
            callback(&rows, &query);
        }
        LoadOutcome::Applied
    }

    /// Loads on start, then again whenever the URL state or the refresh key
    /// changes. A trigger arriving mid-load supersedes that load. Returns
    /// after [`DataViewEngine::shutdown`].
    pub async fn run(&self, mut refresh: RefreshKey) {
        let mut revisions = self.store.subscribe();
        revisions.borrow_and_update();
        self.note_refresh_key(refresh.current());

        loop {
            let load = self.load();
            tokio::pin!(load);
            let mut settled = false;

            loop {
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => return,
                    Ok(()) = revisions.changed() => break,
                    _ = refresh.changed() => {
                        self.note_refresh_key(refresh.current());
                        break;
                    }
                    _ = &mut load, if !settled => settled = true,
                }
            }
        }
    }

    /// Cancels the in-flight request and stops [`DataViewEngine::run`].
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn snapshot(&self) -> DataView<P::Row> {
        let query = self.query();
        let state = self.state.lock();
        let view = &state.view;

        DataView {
            rows: view.rows.clone(),
            total_count: view.total_count,
            total_pages: query.total_pages(view.total_count),
            page: query.page,
            limit: query.limit,
            loading: view.loading,
            error: view.error.as_ref().map(ToString::to_string),
            refresh_key: view.refresh_key,
            query,
        }
    }

    pub fn on_page_change(&self, page: usize) {
        let page = page.max(1).to_string();
        self.store.set_param(PAGE_KEY, Some(&page));
    }

    pub fn on_sort_change(&self, field: &str, dir: SortDir) {
        self.store
            .set_params(&[(SORT_KEY, Some(field)), (DIR_KEY, Some(dir.as_str()))]);
    }

    /// Sets a filter. An empty value or the "all" sentinel clears it.
    pub fn on_filter_change(&self, key: &str, value: &str) {
        let value = value.trim();
        let value = (!value.is_empty() && value != ALL).then_some(value);
        self.store.set_params(&[(key, value), (PAGE_KEY, Some("1"))]);
    }

    pub fn on_search_change(&self, term: &str) {
        let term = term.trim();
        let term = (!term.is_empty()).then_some(term);
        self.store
            .set_params(&[(SEARCH_KEY, term), (PAGE_KEY, Some("1"))]);
    }

    pub fn on_date_range_change(&self, key: &str, range: DateRange) {
        let from_key = format!("{key}{FROM_SUFFIX}");
        let to_key = format!("{key}{TO_SUFFIX}");
        let from = range.from.map(|date| date.to_string());
        let to = range.to.map(|date| date.to_string());

        self.store.set_params(&[
            (&from_key, from.as_deref()),
            (&to_key, to.as_deref()),
            (PAGE_KEY, Some("1")),
        ]);
    }

    pub fn on_limit_change(&self, limit: usize) {
        let limit = limit.max(1).to_string();
        self.store
            .set_params(&[(LIMIT_KEY, Some(&limit)), (PAGE_KEY, Some("1"))]);
    }

    fn note_refresh_key(&self, key: u64) {
        self.state.lock().view.refresh_key = key;
    }
}

impl<P: RowProvider> Drop for DataViewEngine<P> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::query::{FilterConfig, SortConfig, ViewSchema};
    use crate::providers::RowResult;

    struct Counting {
        schema: ViewSchema,
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            Self {
                schema: ViewSchema::new(
                    vec![FilterConfig::select("status", "Статус", &[("Активные", "active")])],
                    SortConfig::new("name", SortDir::Asc, &[("Имя", "name")]),
                ),
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl RowProvider for Counting {
        type Row = u32;

        fn schema(&self) -> &ViewSchema {
            &self.schema
        }

        fn get_rows(&self, _cancel: CancellationToken) -> impl Future<Output = RowResult<u32>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            async move {
                if fail {
                    RowResult::failed(ProviderError::Unavailable)
                } else {
                    RowResult::ok(vec![1, 2, 3], 23)
                }
            }
        }
    }

    fn engine(query: &str, fail: bool) -> DataViewEngine<Counting> {
        DataViewEngine::new(Counting::new(fail), Arc::new(QueryParamStore::new(query)))
    }

    #[tokio::test]
    async fn applied_load_updates_snapshot() {
        let engine = engine("page=2", false);

        assert_eq!(engine.load().await, LoadOutcome::Applied);
        let view = engine.snapshot();

        assert_eq!(view.rows, vec![1, 2, 3]);
        assert_eq!(view.total_count, 23);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.page, 2);
        assert!(!view.loading);
        assert_eq!(view.error, None);
        assert_eq!(engine.view_state().generation, 1);
    }

    #[tokio::test]
    async fn failed_load_sets_error_and_clears_rows() {
        let engine = engine("", true);

        engine.load().await;
        let view = engine.snapshot();

        assert!(view.rows.is_empty());
        assert_eq!(view.total_count, 0);
        assert_eq!(view.error, Some(ProviderError::Unavailable.to_string()));
    }

    #[tokio::test]
    async fn shut_down_engine_discards_results() {
        let engine = engine("", false);
        engine.shutdown();

        assert_eq!(engine.load().await, LoadOutcome::Stale);
        assert!(engine.snapshot().rows.is_empty());
        assert_eq!(engine.snapshot().error, None);
    }

    #[test]
    fn narrowing_intents_reset_page() {
        let engine = engine("page=4&status=active", false);

        engine.on_filter_change("status", ALL);
        assert_eq!(engine.store().query_string(), "page=1");

        engine.on_page_change(3);
        engine.on_search_change("  loft ");
        assert_eq!(engine.store().query_string(), "page=1&search=loft");

        engine.on_page_change(3);
        engine.on_limit_change(50);
        assert_eq!(engine.query().page, 1);
        assert_eq!(engine.query().limit, 50);

        engine.on_page_change(2);
        engine.on_date_range_change(
            "created",
            DateRange::new(NaiveDate::from_ymd_opt(2024, 5, 1), None),
        );
        assert_eq!(engine.store().get("created_from").as_deref(), Some("2024-05-01"));
        assert_eq!(engine.store().get("created_to"), None);
        assert_eq!(engine.query().page, 1);
    }

    #[test]
    fn sort_change_keeps_page() {
        let engine = engine("page=3", false);

        engine.on_sort_change("name", SortDir::Desc);

        assert_eq!(engine.store().query_string(), "page=3&sort=name&dir=desc");
        assert_eq!(engine.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn data_update_sees_rows_and_query() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let engine = engine("status=active", false).with_data_update(move |rows, query| {
            *sink.lock() = Some((rows.to_vec(), query.active_filter("status").map(str::to_string)));
        });

        engine.load().await;

        assert_eq!(
            seen.lock().clone(),
            Some((vec![1, 2, 3], Some("active".to_string())))
        );
    }
}
