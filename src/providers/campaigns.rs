//! Marketing campaigns list.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::domain::campaign::Campaign;
use crate::domain::query::{FilterConfig, SortConfig, SortDir, ViewSchema};
use crate::domain::types::display_date;
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;
use crate::providers::{Listing, ListingKind, RowProvider, RowResult, fetch_rows, list_request};

pub fn schema() -> ViewSchema {
    ViewSchema::new(
        vec![
            FilterConfig::select(
                "status",
                "Статус",
                &[("Черновики", "draft"), ("Активные", "active"), ("Завершённые", "finished")],
            ),
            FilterConfig::select(
                "channel",
                "Канал",
                &[("Email", "email"), ("Соцсети", "social"), ("Реклама", "ads")],
            ),
            FilterConfig::date_range("starts", "Дата старта"),
        ],
        SortConfig::new(
            "starts_at",
            SortDir::Desc,
            &[("Дата старта", "starts_at"), ("Бюджет", "budget"), ("Название", "name")],
        ),
    )
}

fn status_label(status: &str) -> String {
    match status {
        "draft" => "Черновик".to_string(),
        "active" => "Активна".to_string(),
        "finished" => "Завершена".to_string(),
        other => other.to_string(),
    }
}

pub struct CampaignsProvider<A> {
    api: Arc<A>,
    store: Arc<QueryParamStore>,
    schema: ViewSchema,
}

impl<A: ApiClient> RowProvider for CampaignsProvider<A> {
    type Row = Campaign;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = RowResult<Campaign>> + Send {
        async move {
            let (_, request) =
                list_request(ListingKind::Campaigns.path(), &self.store, &self.schema);
            fetch_rows(self.api.as_ref(), &request, &cancel).await
        }
    }
}

impl<A: ApiClient + 'static> Listing<A> for CampaignsProvider<A> {
    const KIND: ListingKind = ListingKind::Campaigns;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self {
        Self {
            api,
            store,
            schema: schema(),
        }
    }

    fn columns() -> Vec<TableColumn<Campaign>> {
        vec![
            TableColumn::new("name", "Название", |c: &Campaign| c.name.clone()),
            TableColumn::new("channel", "Канал", |c: &Campaign| c.channel.clone()),
            TableColumn::new("status", "Статус", |c: &Campaign| status_label(&c.status)),
            TableColumn::new("budget", "Бюджет", |c: &Campaign| {
                c.budget.map(|b| format!("{b:.0} ₽")).unwrap_or_default()
            }),
            TableColumn::new("starts_at", "Старт", |c: &Campaign| display_date(c.starts_at.as_ref())),
            TableColumn::new("ends_at", "Окончание", |c: &Campaign| display_date(c.ends_at.as_ref())),
        ]
    }
}
