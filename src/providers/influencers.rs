//! Influencers list.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::domain::influencer::Influencer;
use crate::domain::query::{FilterConfig, SortConfig, SortDir, ViewSchema};
use crate::domain::types::display_optional;
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;
use crate::providers::{Listing, ListingKind, RowProvider, RowResult, fetch_rows, list_request};

pub fn schema() -> ViewSchema {
    ViewSchema::new(
        vec![
            FilterConfig::select(
                "platform",
                "Платформа",
                &[
                    ("Instagram", "instagram"),
                    ("TikTok", "tiktok"),
                    ("YouTube", "youtube"),
                    ("Telegram", "telegram"),
                ],
            ),
            FilterConfig::select(
                "status",
                "Статус",
                &[("Активные", "active"), ("Приостановленные", "suspended")],
            ),
        ],
        SortConfig::new(
            "followers",
            SortDir::Desc,
            &[("Подписчики", "followers"), ("Имя", "name")],
        ),
    )
}

pub struct InfluencersProvider<A> {
    api: Arc<A>,
    store: Arc<QueryParamStore>,
    schema: ViewSchema,
}

impl<A: ApiClient> RowProvider for InfluencersProvider<A> {
    type Row = Influencer;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = RowResult<Influencer>> + Send {
        async move {
            let (_, request) =
                list_request(ListingKind::Influencers.path(), &self.store, &self.schema);
            fetch_rows(self.api.as_ref(), &request, &cancel).await
        }
    }
}

impl<A: ApiClient + 'static> Listing<A> for InfluencersProvider<A> {
    const KIND: ListingKind = ListingKind::Influencers;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self {
        Self {
            api,
            store,
            schema: schema(),
        }
    }

    fn columns() -> Vec<TableColumn<Influencer>> {
        vec![
            TableColumn::new("name", "Имя", |i: &Influencer| i.name.clone()),
            TableColumn::new("handle", "Аккаунт", |i: &Influencer| display_optional(i.handle.as_ref())),
            TableColumn::new("platform", "Платформа", |i: &Influencer| i.platform.clone()),
            TableColumn::new("followers", "Подписчики", |i: &Influencer| i.followers.to_string()),
            TableColumn::new("status", "Статус", |i: &Influencer| match i.status.as_str() {
                "active" => "Активен".to_string(),
                "suspended" => "Приостановлен".to_string(),
                other => other.to_string(),
            }),
        ]
    }
}
