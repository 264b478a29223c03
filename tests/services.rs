use std::sync::Arc;

use serde_json::json;

use pushkind_realty::api::Method;
use pushkind_realty::forms::{DeleteForm, StatusForm};
use pushkind_realty::providers::{ClientsProvider, ListingKind, ShortLinksProvider};
use pushkind_realty::refresh::RefreshBridge;
use pushkind_realty::services::ServiceError;
use pushkind_realty::services::actions::{change_status, delete_record};
use pushkind_realty::services::export::export_csv;
use pushkind_realty::services::listing::{load_list_page, load_view};

mod common;

use common::{StubApi, paged_clients};

fn status_form(status: &str) -> StatusForm {
    StatusForm {
        status: status.to_string(),
        query: "page=2&status=active".to_string(),
    }
}

#[tokio::test]
async fn status_change_bumps_refresh_key_on_success() {
    let api = StubApi::returning(json!([]));
    let bridge = RefreshBridge::new();

    change_status(&api, &bridge, ListingKind::Clients, "42", &status_form("suspended"))
        .await
        .unwrap();

    let mutations = api.mutations();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].method, Method::Patch);
    assert_eq!(mutations[0].path, "/clients/42");
    assert_eq!(mutations[0].body, Some(json!({"status": "suspended"})));
    assert_eq!(bridge.key(), 1);
}

#[tokio::test]
async fn rejected_status_leaves_refresh_key_alone() {
    let api = StubApi::returning(json!([]));
    let bridge = RefreshBridge::new();

    let result =
        change_status(&api, &bridge, ListingKind::Clients, "42", &status_form("all")).await;

    assert!(matches!(result, Err(ServiceError::Form(_))));
    assert!(api.mutations().is_empty());
    assert_eq!(bridge.key(), 0);
}

#[tokio::test]
async fn failed_mutation_leaves_refresh_key_alone() {
    let api = StubApi::returning(json!([])).failing_mutations();
    let bridge = RefreshBridge::new();

    let result = delete_record(
        &api,
        &bridge,
        ListingKind::ShortLinks,
        "abc",
        &DeleteForm {
            query: String::new(),
        },
    )
    .await;

    assert!(matches!(result, Err(ServiceError::Api(_))));
    assert_eq!(api.mutations()[0].method, Method::Delete);
    assert_eq!(api.mutations()[0].path, "/short-links/abc");
    assert_eq!(bridge.key(), 0);
}

#[tokio::test]
async fn blank_record_id_is_rejected() {
    let api = StubApi::returning(json!([]));
    let bridge = RefreshBridge::new();

    let result = delete_record(
        &api,
        &bridge,
        ListingKind::Clients,
        "  ",
        &DeleteForm {
            query: String::new(),
        },
    )
    .await;

    assert!(matches!(result, Err(ServiceError::Form(_))));
    assert!(api.mutations().is_empty());
}

#[tokio::test]
async fn list_page_carries_rows_pager_and_filters() {
    let api = Arc::new(StubApi::new(paged_clients(25)));
    let bridge = RefreshBridge::new();
    bridge.bump();

    let page = load_list_page::<ClientsProvider<StubApi>, _>(
        api,
        "page=2&limit=10&status=active",
        &bridge,
    )
    .await;

    assert_eq!(page.name, "clients");
    assert_eq!(page.rows.len(), 10);
    assert_eq!(page.rows[0].id.as_deref(), Some("11"));
    assert_eq!(page.rows[0].cells[0], "Клиент 11");
    assert_eq!(page.pager.total_pages, 3);
    assert_eq!(page.pager.page, 2);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.refresh_key, 1);
    assert_eq!(page.error, None);
    assert_eq!(page.filters[0].selected.as_deref(), Some("active"));
    assert_eq!(page.headers.len(), page.rows[0].cells.len());
    assert!(page.status_options.iter().any(|o| o.value == "suspended"));
    assert_eq!(page.query_string, "page=2&limit=10&status=active");
}

#[tokio::test]
async fn view_reports_backend_failure_inline() {
    let api = Arc::new(StubApi::new(|_| {
        Err(pushkind_realty::api::ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        })
    }));

    let view = load_view::<ShortLinksProvider<StubApi>, _>(api, "", &RefreshBridge::new()).await;

    assert!(view.rows.is_empty());
    assert_eq!(view.total_pages, 0);
    assert!(view.error.is_some());
    assert_eq!(view.limit, 20);
}

#[tokio::test]
async fn export_writes_the_displayed_rows() {
    let api = Arc::new(StubApi::new(paged_clients(12)));

    let export = export_csv::<ClientsProvider<StubApi>, _>(api, "limit=5&page=3&status=active")
        .await
        .unwrap();

    let content = String::from_utf8(export.content).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(export.file_name, "clients_status-active.csv");
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Имя,Email,Телефон,Статус"));
    assert!(lines[1].starts_with("Клиент 11,"));
    assert!(lines[2].starts_with("Клиент 12,"));
}

#[tokio::test]
async fn export_fails_when_backend_fails() {
    let api = Arc::new(StubApi::new(|_| {
        Err(pushkind_realty::api::ApiError::Unauthorized)
    }));

    let result = export_csv::<ClientsProvider<StubApi>, _>(api, "").await;

    assert!(matches!(result, Err(ServiceError::Provider(_))));
}

#[tokio::test]
async fn page_far_past_the_end_still_renders() {
    let api = Arc::new(StubApi::returning(json!({"records": [], "total_records": 25})));
    let bridge = RefreshBridge::new();

    let page = load_list_page::<ClientsProvider<StubApi>, _>(
        api,
        "page=18446744073709551615",
        &bridge,
    )
    .await;

    assert!(page.rows.is_empty());
    assert_eq!(page.pager.total_pages, 3);
    assert_eq!(page.pager.pages, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(page.pager.next, None);
    assert_eq!(page.error, None);
}
