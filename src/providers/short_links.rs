//! Short links list.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::domain::query::{FilterConfig, SortConfig, SortDir, ViewSchema};
use crate::domain::short_link::ShortLink;
use crate::domain::types::display_timestamp;
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;
use crate::providers::{Listing, ListingKind, RowProvider, RowResult, fetch_rows, list_request};

pub fn schema() -> ViewSchema {
    ViewSchema::new(
        vec![
            FilterConfig::select(
                "status",
                "Статус",
                &[("Активные", "active"), ("Отключённые", "disabled")],
            ),
            FilterConfig::date_range("created", "Дата создания"),
        ],
        SortConfig::new(
            "created_at",
            SortDir::Desc,
            &[("Дата создания", "created_at"), ("Переходы", "clicks")],
        ),
    )
    .with_limit(20)
}

pub struct ShortLinksProvider<A> {
    api: Arc<A>,
    store: Arc<QueryParamStore>,
    schema: ViewSchema,
}

impl<A: ApiClient> RowProvider for ShortLinksProvider<A> {
    type Row = ShortLink;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = RowResult<ShortLink>> + Send {
        async move {
            let (_, request) =
                list_request(ListingKind::ShortLinks.path(), &self.store, &self.schema);
            fetch_rows(self.api.as_ref(), &request, &cancel).await
        }
    }
}

impl<A: ApiClient + 'static> Listing<A> for ShortLinksProvider<A> {
    const KIND: ListingKind = ListingKind::ShortLinks;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self {
        Self {
            api,
            store,
            schema: schema(),
        }
    }

    fn columns() -> Vec<TableColumn<ShortLink>> {
        vec![
            TableColumn::new("code", "Код", |l: &ShortLink| l.code.clone()),
            TableColumn::new("target_url", "Адрес", |l: &ShortLink| l.target_url.clone()),
            TableColumn::new("clicks", "Переходы", |l: &ShortLink| l.clicks.to_string()),
            TableColumn::new("status", "Статус", |l: &ShortLink| match l.status.as_str() {
                "active" => "Активна".to_string(),
                "disabled" => "Отключена".to_string(),
                other => other.to_string(),
            }),
            TableColumn::new("created_at", "Дата создания", |l: &ShortLink| {
                display_timestamp(l.created_at.as_ref())
            }),
        ]
    }
}
