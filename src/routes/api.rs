use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde_json::json;

use crate::api::http::HttpApiClient;
use crate::providers::ListingKind;
use crate::routes::with_listing;
use crate::services::RefreshBridges;
use crate::services::listing::load_view;

#[get("/v1/{entity}")]
pub async fn api_v1_listing(
    entity: web::Path<String>,
    req: HttpRequest,
    api: web::Data<HttpApiClient>,
    bridges: web::Data<RefreshBridges>,
) -> impl Responder {
    let Some(kind) = ListingKind::from_name(&entity) else {
        return HttpResponse::NotFound().finish();
    };

    let api = api.into_inner();
    let bridge = bridges.get(kind);
    with_listing!(kind, HttpApiClient, |L| {
        let view = load_view::<L, HttpApiClient>(api, req.query_string(), bridge).await;
        HttpResponse::Ok().json(view)
    })
}

#[get("/v1/{entity}/refresh-key")]
pub async fn api_v1_refresh_key(
    entity: web::Path<String>,
    bridges: web::Data<RefreshBridges>,
) -> impl Responder {
    match ListingKind::from_name(&entity) {
        Some(kind) => HttpResponse::Ok().json(json!({ "refresh_key": bridges.get(kind).key() })),
        None => HttpResponse::NotFound().finish(),
    }
}
