//! Query engine behind the brokerage admin dashboard lists.
//!
//! The URL query string drives every list: [`params::QueryParamStore`] holds
//! it, [`engine::DataViewEngine`] turns changes into fetches through a
//! [`providers::RowProvider`], and [`refresh::RefreshBridge`] lets row
//! actions force a re-fetch.

pub mod api;
pub mod domain;
pub mod dto;
pub mod engine;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod params;
pub mod providers;
pub mod refresh;
pub mod services;
pub mod session;

#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actix_files::Files;
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::api::http::HttpApiClient;
    use crate::models::config::ServerConfig;
    use crate::routes::actions::{change_status, delete_record};
    use crate::routes::api::{api_v1_listing, api_v1_refresh_key};
    use crate::routes::listing::{export_listing, show_listing};
    use crate::routes::main::{logout, show_index};
    use crate::services::RefreshBridges;
    use crate::session::{Session, SessionHandle, StaticSessionStore};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let seed = server_config.api.token.clone().map(Session::new);
        let session = SessionHandle::load(Box::new(StaticSessionStore::new(seed)))
            .map_err(|e| std::io::Error::other(format!("Failed to load session: {e}")))?;
        let session = Arc::new(session);

        let api_client = HttpApiClient::new(&server_config.api, session.clone())
            .map_err(|e| std::io::Error::other(format!("Failed to create API client: {e}")))?;

        let bridges = Arc::new(RefreshBridges::new());

        let secret_key = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| std::io::Error::other(format!("Invalid secret key: {e}")))?;

        let message_store = CookieMessageStore::builder(secret_key).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving {} on {}:{}, backend {}",
            server_config.domain,
            server_config.address,
            server_config.port,
            server_config.api.base_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(message_framework.clone())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(
                    web::scope("/api")
                        .service(api_v1_refresh_key)
                        .service(api_v1_listing),
                )
                .service(show_index)
                .service(logout)
                .service(export_listing)
                .service(change_status)
                .service(delete_record)
                .service(show_listing)
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(api_client.clone()))
                .app_data(web::Data::from(session.clone()))
                .app_data(web::Data::from(bridges.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
