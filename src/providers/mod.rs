//! Row providers: one adapter per list entity.
//!
//! A provider reads the current [`QueryState`] itself, turns it into a
//! backend request, and maps the response into rows. Providers never fail:
//! errors and cancellation are reported inside the [`RowResult`].

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::api::envelope::normalize;
use crate::api::{ApiClient, ApiError, ListRequest};
use crate::domain::query::{QueryState, ViewSchema};
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;

pub mod appointments;
pub mod campaigns;
pub mod clients;
pub mod influencers;
pub mod partners;
pub mod property_submissions;
pub mod short_links;

pub use appointments::AppointmentsProvider;
pub use campaigns::CampaignsProvider;
pub use clients::ClientsProvider;
pub use influencers::InfluencersProvider;
pub use partners::PartnersProvider;
pub use property_submissions::PropertySubmissionsProvider;
pub use short_links::ShortLinksProvider;

/// User-facing failure of a fetch cycle. Details go to the log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Сессия истекла. Войдите снова.")]
    Unauthorized,
    #[error("Не удалось загрузить данные. Попробуйте ещё раз.")]
    Unavailable,
}

impl From<&ApiError> for ProviderError {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized => ProviderError::Unauthorized,
            _ => ProviderError::Unavailable,
        }
    }
}

/// Outcome of one fetch cycle. An error always comes with empty rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowResult<T> {
    pub rows: Vec<T>,
    pub total_count: Option<usize>,
    pub error: Option<ProviderError>,
}

impl<T> RowResult<T> {
    pub fn ok(rows: Vec<T>, total_count: usize) -> Self {
        Self {
            rows,
            total_count: Some(total_count),
            error: None,
        }
    }

    /// Result of an aborted fetch: no rows and no error.
    pub fn cancelled() -> Self {
        Self {
            rows: Vec::new(),
            total_count: None,
            error: None,
        }
    }

    pub fn failed(error: ProviderError) -> Self {
        Self {
            rows: Vec::new(),
            total_count: None,
            error: Some(error),
        }
    }
}

pub trait RowProvider: Send + Sync {
    type Row: Clone + Send + Sync + 'static;

    fn schema(&self) -> &ViewSchema;

    /// Fetches the rows for the current URL state.
    fn get_rows(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = RowResult<Self::Row>> + Send;
}

/// Every list page the dashboard serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Clients,
    Partners,
    PropertySubmissions,
    Appointments,
    ShortLinks,
    Influencers,
    Campaigns,
}

impl ListingKind {
    pub const ALL: [ListingKind; 7] = [
        ListingKind::Clients,
        ListingKind::Partners,
        ListingKind::PropertySubmissions,
        ListingKind::Appointments,
        ListingKind::ShortLinks,
        ListingKind::Influencers,
        ListingKind::Campaigns,
    ];

    /// URL slug of the dashboard page.
    pub fn name(self) -> &'static str {
        match self {
            ListingKind::Clients => "clients",
            ListingKind::Partners => "partners",
            ListingKind::PropertySubmissions => "property-submissions",
            ListingKind::Appointments => "appointments",
            ListingKind::ShortLinks => "short-links",
            ListingKind::Influencers => "influencers",
            ListingKind::Campaigns => "campaigns",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn title(self) -> &'static str {
        match self {
            ListingKind::Clients => "Клиенты",
            ListingKind::Partners => "Партнёры",
            ListingKind::PropertySubmissions => "Заявки на объекты",
            ListingKind::Appointments => "Встречи",
            ListingKind::ShortLinks => "Короткие ссылки",
            ListingKind::Influencers => "Инфлюенсеры",
            ListingKind::Campaigns => "Кампании",
        }
    }

    /// Backend collection path.
    pub fn path(self) -> &'static str {
        match self {
            ListingKind::Clients => "/clients",
            ListingKind::Partners => "/partners",
            ListingKind::PropertySubmissions => "/property-submissions",
            ListingKind::Appointments => "/appointments",
            ListingKind::ShortLinks => "/short-links",
            ListingKind::Influencers => "/influencers",
            ListingKind::Campaigns => "/campaigns",
        }
    }

    pub fn schema(self) -> ViewSchema {
        match self {
            ListingKind::Clients => clients::schema(),
            ListingKind::Partners => partners::schema(),
            ListingKind::PropertySubmissions => property_submissions::schema(),
            ListingKind::Appointments => appointments::schema(),
            ListingKind::ShortLinks => short_links::schema(),
            ListingKind::Influencers => influencers::schema(),
            ListingKind::Campaigns => campaigns::schema(),
        }
    }
}

/// A provider that backs a dashboard page: static schema, columns and constructor.
pub trait Listing<A: ApiClient>:
    RowProvider<Row: Serialize + DeserializeOwned> + Sized + 'static
{
    const KIND: ListingKind;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self;

    fn columns() -> Vec<TableColumn<Self::Row>>;
}

/// Shared fetch path: request, cancellation race, envelope normalization.
pub async fn fetch_rows<A, T>(
    api: &A,
    request: &ListRequest,
    cancel: &CancellationToken,
) -> RowResult<T>
where
    A: ApiClient,
    T: DeserializeOwned + Send,
{
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            log::debug!("Fetch of {} cancelled", request.path);
            return RowResult::cancelled();
        }
        response = api.get_json(request) => response,
    };

    if cancel.is_cancelled() {
        return RowResult::cancelled();
    }

    match response {
        Ok(body) => {
            let envelope = normalize(body);
            let rows = decode_rows(envelope.records, &request.path);
            RowResult::ok(rows, envelope.total)
        }
        Err(err) => {
            log::error!("Failed to fetch {}: {err}", request.path);
            RowResult::failed(ProviderError::from(&err))
        }
    }
}

/// Current query state plus the conventional request for `path`.
pub fn list_request(
    path: &str,
    store: &QueryParamStore,
    schema: &ViewSchema,
) -> (QueryState, ListRequest) {
    let query = QueryState::read(store, schema);
    let request = ListRequest::from_query(path, &query, schema);
    (query, request)
}

fn decode_rows<T: DeserializeOwned>(records: Vec<Value>, path: &str) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(row) => Some(row),
            Err(err) => {
                log::warn!("Skipping malformed row from {path}: {err}");
                None
            }
        })
        .collect()
}
