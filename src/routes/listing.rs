use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::http::HttpApiClient;
use crate::providers::ListingKind;
use crate::routes::{base_context, render_template, with_listing};
use crate::services::export::export_csv;
use crate::services::listing::load_list_page;
use crate::services::{RefreshBridges, ServiceError};
use crate::session::SessionHandle;

#[get("/{entity}")]
pub async fn show_listing(
    entity: web::Path<String>,
    req: HttpRequest,
    api: web::Data<HttpApiClient>,
    bridges: web::Data<RefreshBridges>,
    session: web::Data<SessionHandle>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(kind) = ListingKind::from_name(&entity) else {
        return HttpResponse::NotFound().finish();
    };

    let api = api.into_inner();
    let bridge = bridges.get(kind);
    let data = with_listing!(kind, HttpApiClient, |L| {
        load_list_page::<L, HttpApiClient>(api, req.query_string(), bridge).await
    });

    let mut context = base_context(&flash_messages, &session, kind.name());
    context.insert("list", &data);
    render_template(&tera, "listing/index.html", &context)
}

#[get("/{entity}/export.csv")]
pub async fn export_listing(
    entity: web::Path<String>,
    req: HttpRequest,
    api: web::Data<HttpApiClient>,
) -> impl Responder {
    let Some(kind) = ListingKind::from_name(&entity) else {
        return HttpResponse::NotFound().finish();
    };

    let api = api.into_inner();
    let result = with_listing!(kind, HttpApiClient, |L| {
        export_csv::<L, HttpApiClient>(api, req.query_string()).await
    });

    match result {
        Ok(export) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ))
            .body(export.content),
        Err(ServiceError::Provider(err)) => {
            HttpResponse::BadGateway().body(err.to_string())
        }
        Err(err) => {
            log::error!("Failed to export {}: {err}", kind.name());
            HttpResponse::InternalServerError().finish()
        }
    }
}
