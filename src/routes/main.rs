use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::routes::{base_context, redirect, render_template};
use crate::session::SessionHandle;

#[get("/")]
pub async fn show_index(
    session: web::Data<SessionHandle>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &session, "index");
    render_template(&tera, "main/index.html", &context)
}

#[post("/logout")]
pub async fn logout(session: web::Data<SessionHandle>) -> impl Responder {
    match session.invalidate() {
        Ok(()) => {
            FlashMessage::info("Вы вышли из системы.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to clear the session: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
