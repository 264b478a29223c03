use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use pushkind_realty::api::ApiError;
use pushkind_realty::params::QueryParamStore;
use pushkind_realty::providers::{
    AppointmentsProvider, ClientsProvider, Listing, PartnersProvider, ProviderError, RowProvider,
    ShortLinksProvider,
};

mod common;

use common::{StubApi, paged_clients};

fn clients(api: Arc<StubApi>, query: &str) -> ClientsProvider<StubApi> {
    ClientsProvider::new(api, Arc::new(QueryParamStore::new(query)))
}

#[tokio::test]
async fn envelope_shapes_produce_identical_results() {
    let records = json!([
        {"id": 1, "name": "Анна", "status": "active"},
        {"id": "2", "name": "Борис", "status": "suspended"}
    ]);
    let bodies = [
        json!({"records": records.clone(), "total_records": 2}),
        json!({"data": records.clone(), "total": 2}),
        records.clone(),
    ];

    let mut results = Vec::new();
    for body in bodies {
        let api = Arc::new(StubApi::returning(body));
        results.push(clients(api, "").get_rows(CancellationToken::new()).await);
    }

    assert_eq!(results[0].rows.len(), 2);
    assert_eq!(results[0].total_count, Some(2));
    assert_eq!(results[0].error, None);
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}

#[tokio::test]
async fn unrecognized_shape_is_an_empty_set() {
    let api = Arc::new(StubApi::returning(json!({"message": "ok"})));

    let result = clients(api, "").get_rows(CancellationToken::new()).await;

    assert!(result.rows.is_empty());
    assert_eq!(result.total_count, Some(0));
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn malformed_rows_are_skipped() {
    let api = Arc::new(StubApi::returning(json!({
        "records": [{"id": 1, "name": "Анна"}, {"name": "без id"}, {"id": 3}],
        "total_records": 3
    })));

    let result = clients(api, "").get_rows(CancellationToken::new()).await;

    let ids: Vec<&str> = result.rows.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(result.total_count, Some(3));
}

#[tokio::test]
async fn all_sentinel_and_defaults_shape_the_request() {
    let api = Arc::new(StubApi::returning(json!([])));

    clients(api.clone(), "status=all&search=%20").get_rows(CancellationToken::new()).await;

    let request = &api.requests()[0];
    assert_eq!(request.path, "/clients");
    assert_eq!(request.get("status"), None);
    assert_eq!(request.get("search"), None);
    assert_eq!(request.get("page"), Some("1"));
    assert_eq!(request.get("limit"), Some("10"));
    assert_eq!(request.get("sort"), Some("created_at"));
    assert_eq!(request.get("dir"), Some("desc"));
}

#[tokio::test]
async fn entity_specific_request_mapping() {
    let api = Arc::new(StubApi::returning(json!([])));
    let store = Arc::new(QueryParamStore::new(
        "agentId=7&scheduled_from=2024-06-01&scheduled_to=2024-06-30",
    ));

    AppointmentsProvider::new(api.clone(), store)
        .get_rows(CancellationToken::new())
        .await;

    let request = &api.requests()[0];
    assert_eq!(request.get("agent_id"), Some("7"));
    assert_eq!(request.get("scheduled_from"), Some("2024-06-01"));
    assert_eq!(request.get("scheduled_to"), Some("2024-06-30"));
}

#[tokio::test]
async fn active_partners_use_the_dedicated_endpoint() {
    let api = Arc::new(StubApi::returning(json!([])));

    for query in ["status=active", "status=active&type=agency"] {
        PartnersProvider::new(api.clone(), Arc::new(QueryParamStore::new(query)))
            .get_rows(CancellationToken::new())
            .await;
    }

    let requests = api.requests();
    assert_eq!(requests[0].path, "/partners/active");
    assert_eq!(requests[0].get("status"), None);
    assert_eq!(requests[1].path, "/partners");
    assert_eq!(requests[1].get("status"), Some("active"));
}

#[tokio::test]
async fn short_links_default_to_a_larger_page() {
    let api = Arc::new(StubApi::returning(json!([])));

    ShortLinksProvider::new(api.clone(), Arc::new(QueryParamStore::default()))
        .get_rows(CancellationToken::new())
        .await;

    assert_eq!(api.requests()[0].get("limit"), Some("20"));
}

#[tokio::test]
async fn backend_errors_become_data() {
    let api = Arc::new(StubApi::new(|_| {
        Err(ApiError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
    }));

    let result = clients(api, "").get_rows(CancellationToken::new()).await;

    assert!(result.rows.is_empty());
    assert_eq!(result.error, Some(ProviderError::Unavailable));
}

#[tokio::test]
async fn expired_session_is_reported() {
    let api = Arc::new(StubApi::new(|_| Err(ApiError::Unauthorized)));

    let result = clients(api, "").get_rows(CancellationToken::new()).await;

    assert_eq!(result.error, Some(ProviderError::Unauthorized));
}

#[tokio::test]
async fn cancelled_fetch_is_not_an_error() {
    let api = Arc::new(StubApi::new(paged_clients(25)));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = clients(api, "").get_rows(cancel).await;

    assert!(result.rows.is_empty());
    assert_eq!(result.total_count, None);
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn second_page_of_active_clients() {
    let api = Arc::new(StubApi::new(paged_clients(25)));

    let result = clients(api.clone(), "page=2&limit=10&status=active")
        .get_rows(CancellationToken::new())
        .await;

    let request = &api.requests()[0];
    assert_eq!(request.get("page"), Some("2"));
    assert_eq!(request.get("limit"), Some("10"));
    assert_eq!(request.get("status"), Some("active"));
    let ids: Vec<&str> = result.rows.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, (11..=20).map(|n| n.to_string()).collect::<Vec<_>>());
    assert_eq!(result.total_count, Some(25));
}
