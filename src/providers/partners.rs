//! Partners list.
//!
//! The backend exposes a cheaper `/partners/active` endpoint. It is used when
//! the only narrowing is `status=active`; every other combination goes to the
//! general collection.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ListRequest};
use crate::domain::partner::Partner;
use crate::domain::query::{FilterConfig, QueryState, SortConfig, SortDir, ViewSchema};
use crate::domain::types::{display_optional, display_timestamp};
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;
use crate::providers::{Listing, ListingKind, RowProvider, RowResult, fetch_rows, list_request};

const STATUS: &str = "status";
const ACTIVE: &str = "active";

pub fn schema() -> ViewSchema {
    ViewSchema::new(
        vec![
            FilterConfig::select(
                STATUS,
                "Статус",
                &[("Активные", ACTIVE), ("На проверке", "pending"), ("Отключённые", "disabled")],
            ),
            FilterConfig::select(
                "type",
                "Тип",
                &[
                    ("Агентство", "agency"),
                    ("Застройщик", "developer"),
                    ("Ипотечный брокер", "mortgage"),
                ],
            ),
        ],
        SortConfig::new(
            "created_at",
            SortDir::Desc,
            &[("Дата добавления", "created_at"), ("Название", "name")],
        ),
    )
}

fn type_label(partner_type: &str) -> String {
    match partner_type {
        "agency" => "Агентство".to_string(),
        "developer" => "Застройщик".to_string(),
        "mortgage" => "Ипотечный брокер".to_string(),
        other => other.to_string(),
    }
}

fn status_label(status: &str) -> String {
    match status {
        ACTIVE => "Активен".to_string(),
        "pending" => "На проверке".to_string(),
        "disabled" => "Отключён".to_string(),
        other => other.to_string(),
    }
}

/// Routes "active only" queries to the dedicated endpoint.
fn route(query: &QueryState, request: ListRequest) -> ListRequest {
    let only_active = query.active_filter_keys() == [STATUS]
        && query.active_filter(STATUS) == Some(ACTIVE)
        && query.search.is_none();

    if only_active {
        ListRequest {
            path: format!("{}/active", ListingKind::Partners.path()),
            ..request
        }
        .without(STATUS)
    } else {
        request
    }
}

pub struct PartnersProvider<A> {
    api: Arc<A>,
    store: Arc<QueryParamStore>,
    schema: ViewSchema,
}

impl<A: ApiClient> RowProvider for PartnersProvider<A> {
    type Row = Partner;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = RowResult<Partner>> + Send {
        async move {
            let (query, request) =
                list_request(ListingKind::Partners.path(), &self.store, &self.schema);
            let request = route(&query, request);
            fetch_rows(self.api.as_ref(), &request, &cancel).await
        }
    }
}

impl<A: ApiClient + 'static> Listing<A> for PartnersProvider<A> {
    const KIND: ListingKind = ListingKind::Partners;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self {
        Self {
            api,
            store,
            schema: schema(),
        }
    }

    fn columns() -> Vec<TableColumn<Partner>> {
        vec![
            TableColumn::new("name", "Название", |p: &Partner| p.name.clone()),
            TableColumn::new("company", "Компания", |p: &Partner| display_optional(p.company.as_ref())),
            TableColumn::new("type", "Тип", |p: &Partner| type_label(&p.partner_type)),
            TableColumn::new("email", "Email", |p: &Partner| display_optional(p.email.as_ref())),
            TableColumn::new("status", "Статус", |p: &Partner| status_label(&p.status)),
            TableColumn::new("created_at", "Дата добавления", |p: &Partner| {
                display_timestamp(p.created_at.as_ref())
            }),
        ]
    }
}
