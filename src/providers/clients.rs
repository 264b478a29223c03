//! Clients list.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::domain::client::Client;
use crate::domain::query::{FilterConfig, SortConfig, SortDir, ViewSchema};
use crate::domain::types::{display_optional, display_timestamp};
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;
use crate::providers::{Listing, ListingKind, RowProvider, RowResult, fetch_rows, list_request};

pub fn schema() -> ViewSchema {
    ViewSchema::new(
        vec![FilterConfig::select(
            "status",
            "Статус",
            &[("Активные", "active"), ("Приостановленные", "suspended")],
        )],
        SortConfig::new(
            "created_at",
            SortDir::Desc,
            &[("Дата регистрации", "created_at"), ("Имя", "name")],
        ),
    )
}

fn status_label(status: &str) -> String {
    match status {
        "active" => "Активен".to_string(),
        "suspended" => "Приостановлен".to_string(),
        other => other.to_string(),
    }
}

pub struct ClientsProvider<A> {
    api: Arc<A>,
    store: Arc<QueryParamStore>,
    schema: ViewSchema,
}

impl<A: ApiClient> RowProvider for ClientsProvider<A> {
    type Row = Client;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(&self, cancel: CancellationToken) -> impl Future<Output = RowResult<Client>> + Send {
        async move {
            let (_, request) = list_request(ListingKind::Clients.path(), &self.store, &self.schema);
            fetch_rows(self.api.as_ref(), &request, &cancel).await
        }
    }
}

impl<A: ApiClient + 'static> Listing<A> for ClientsProvider<A> {
    const KIND: ListingKind = ListingKind::Clients;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self {
        Self {
            api,
            store,
            schema: schema(),
        }
    }

    fn columns() -> Vec<TableColumn<Client>> {
        vec![
            TableColumn::new("name", "Имя", |c: &Client| c.name.clone()),
            TableColumn::new("email", "Email", |c: &Client| display_optional(c.email.as_ref())),
            TableColumn::new("phone", "Телефон", |c: &Client| display_optional(c.phone.as_ref())),
            TableColumn::new("status", "Статус", |c: &Client| status_label(&c.status)),
            TableColumn::new("agent", "Агент", |c: &Client| display_optional(c.agent_name.as_ref())),
            TableColumn::new("created_at", "Дата регистрации", |c: &Client| {
                display_timestamp(c.created_at.as_ref())
            }),
        ]
    }
}
