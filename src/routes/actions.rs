use actix_web::{HttpResponse, Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::api::http::HttpApiClient;
use crate::forms::{DeleteForm, StatusForm};
use crate::providers::ListingKind;
use crate::routes::{listing_location, redirect};
use crate::services::{RefreshBridges, ServiceError, actions as actions_service};

#[post("/{entity}/{id}/status")]
pub async fn change_status(
    path: web::Path<(String, String)>,
    api: web::Data<HttpApiClient>,
    bridges: web::Data<RefreshBridges>,
    web::Form(form): web::Form<StatusForm>,
) -> impl Responder {
    let (entity, id) = path.into_inner();
    let Some(kind) = ListingKind::from_name(&entity) else {
        return HttpResponse::NotFound().finish();
    };
    let location = listing_location(kind, &form.query);

    match actions_service::change_status(api.get_ref(), bridges.get(kind), kind, &id, &form).await
    {
        Ok(()) => FlashMessage::success("Статус обновлён.").send(),
        Err(err) => flash_failure(err, "Ошибка при изменении статуса"),
    }
    redirect(&location)
}

#[post("/{entity}/{id}/delete")]
pub async fn delete_record(
    path: web::Path<(String, String)>,
    api: web::Data<HttpApiClient>,
    bridges: web::Data<RefreshBridges>,
    web::Form(form): web::Form<DeleteForm>,
) -> impl Responder {
    let (entity, id) = path.into_inner();
    let Some(kind) = ListingKind::from_name(&entity) else {
        return HttpResponse::NotFound().finish();
    };
    let location = listing_location(kind, &form.query);

    match actions_service::delete_record(api.get_ref(), bridges.get(kind), kind, &id, &form).await
    {
        Ok(()) => FlashMessage::success("Запись удалена.").send(),
        Err(err) => flash_failure(err, "Ошибка при удалении записи"),
    }
    redirect(&location)
}

fn flash_failure(err: ServiceError, fallback: &str) {
    match err {
        ServiceError::Form(message) => FlashMessage::error(message).send(),
        ServiceError::Unauthorized => {
            FlashMessage::error("Сессия истекла. Войдите снова.").send()
        }
        ServiceError::NotFound => FlashMessage::error("Запись не найдена.").send(),
        err => {
            log::error!("{fallback}: {err}");
            FlashMessage::error(fallback.to_string()).send();
        }
    }
}
