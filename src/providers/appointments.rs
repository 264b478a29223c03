//! Appointments calendar list.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::domain::appointment::Appointment;
use crate::domain::query::{FilterConfig, SortConfig, SortDir, ViewSchema};
use crate::domain::types::{display_optional, display_timestamp};
use crate::dto::table::TableColumn;
use crate::params::QueryParamStore;
use crate::providers::{Listing, ListingKind, RowProvider, RowResult, fetch_rows, list_request};

const AGENT_KEY: &str = "agentId";
const AGENT_PARAM: &str = "agent_id";

pub fn schema() -> ViewSchema {
    ViewSchema::new(
        vec![
            FilterConfig::select(
                "status",
                "Статус",
                &[
                    ("Запланированные", "scheduled"),
                    ("Состоявшиеся", "completed"),
                    ("Отменённые", "cancelled"),
                ],
            ),
            FilterConfig::custom(AGENT_KEY, "Агент", "agent_picker"),
            FilterConfig::date_range("scheduled", "Дата встречи"),
        ],
        SortConfig::new(
            "scheduled_at",
            SortDir::Desc,
            &[("Дата встречи", "scheduled_at"), ("Клиент", "client_name")],
        ),
    )
}

fn status_label(status: &str) -> String {
    match status {
        "scheduled" => "Запланирована".to_string(),
        "completed" => "Состоялась".to_string(),
        "cancelled" => "Отменена".to_string(),
        other => other.to_string(),
    }
}

pub struct AppointmentsProvider<A> {
    api: Arc<A>,
    store: Arc<QueryParamStore>,
    schema: ViewSchema,
}

impl<A: ApiClient> RowProvider for AppointmentsProvider<A> {
    type Row = Appointment;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = RowResult<Appointment>> + Send {
        async move {
            let (_, request) =
                list_request(ListingKind::Appointments.path(), &self.store, &self.schema);
            let request = request.rename(AGENT_KEY, AGENT_PARAM);
            fetch_rows(self.api.as_ref(), &request, &cancel).await
        }
    }
}

impl<A: ApiClient + 'static> Listing<A> for AppointmentsProvider<A> {
    const KIND: ListingKind = ListingKind::Appointments;

    fn new(api: Arc<A>, store: Arc<QueryParamStore>) -> Self {
        Self {
            api,
            store,
            schema: schema(),
        }
    }

    fn columns() -> Vec<TableColumn<Appointment>> {
        vec![
            TableColumn::new("scheduled_at", "Дата встречи", |a: &Appointment| {
                display_timestamp(a.scheduled_at.as_ref())
            }),
            TableColumn::new("client_name", "Клиент", |a: &Appointment| a.client_name.clone()),
            TableColumn::new("property", "Объект", |a: &Appointment| {
                display_optional(a.property_title.as_ref())
            }),
            TableColumn::new("agent", "Агент", |a: &Appointment| display_optional(a.agent_name.as_ref())),
            TableColumn::new("status", "Статус", |a: &Appointment| status_label(&a.status)),
        ]
    }
}
