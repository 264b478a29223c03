//! Property submissions awaiting moderation.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::domain::property_submission::PropertySubmission;
use crate::domain::query::{FilterConfig, SortConfig, SortDir, ViewSchema};
use crate::domain::types::{display_optional, display_timestamp};
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;
use crate::providers::{Listing, ListingKind, RowProvider, RowResult, fetch_rows, list_request};

pub fn schema() -> ViewSchema {
    ViewSchema::new(
        vec![
            FilterConfig::select(
                "status",
                "Статус",
                &[
                    ("На модерации", "pending"),
                    ("Одобренные", "approved"),
                    ("Отклонённые", "rejected"),
                ],
            ),
            FilterConfig::date_range("submitted", "Дата подачи"),
        ],
        SortConfig::new(
            "submitted_at",
            SortDir::Desc,
            &[("Дата подачи", "submitted_at"), ("Цена", "price")],
        ),
    )
}

fn status_label(status: &str) -> String {
    match status {
        "pending" => "На модерации".to_string(),
        "approved" => "Одобрена".to_string(),
        "rejected" => "Отклонена".to_string(),
        other => other.to_string(),
    }
}

fn price_label(price: Option<f64>) -> String {
    price.map(|p| format!("{p:.0} ₽")).unwrap_or_default()
}

pub struct PropertySubmissionsProvider<A> {
    api: Arc<A>,
    store: Arc<QueryParamStore>,
    schema: ViewSchema,
}

impl<A: ApiClient> RowProvider for PropertySubmissionsProvider<A> {
    type Row = PropertySubmission;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = RowResult<PropertySubmission>> + Send {
        async move {
            let (_, request) = list_request(
                ListingKind::PropertySubmissions.path(),
                &self.store,
                &self.schema,
            );
            fetch_rows(self.api.as_ref(), &request, &cancel).await
        }
    }
}

impl<A: ApiClient + 'static> Listing<A> for PropertySubmissionsProvider<A> {
    const KIND: ListingKind = ListingKind::PropertySubmissions;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self {
        Self {
            api,
            store,
            schema: schema(),
        }
    }

    fn columns() -> Vec<TableColumn<PropertySubmission>> {
        vec![
            TableColumn::new("title", "Объект", |s: &PropertySubmission| s.title.clone()),
            TableColumn::new("address", "Адрес", |s: &PropertySubmission| display_optional(s.address.as_ref())),
            TableColumn::new("owner", "Владелец", |s: &PropertySubmission| display_optional(s.owner_name.as_ref())),
            TableColumn::new("price", "Цена", |s: &PropertySubmission| price_label(s.price)),
            TableColumn::new("status", "Статус", |s: &PropertySubmission| status_label(&s.status)),
            TableColumn::new("submitted_at", "Дата подачи", |s: &PropertySubmission| {
                display_timestamp(s.submitted_at.as_ref())
            }),
        ]
    }
}
