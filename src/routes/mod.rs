//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::providers::ListingKind;
use crate::session::SessionHandle;

pub mod actions;
pub mod api;
pub mod listing;
pub mod main;

/// Runs `$body` with `$listing` bound to the provider type serving `$kind`.
macro_rules! with_listing {
    ($kind:expr, $api:ty, |$listing:ident| $body:expr) => {
        match $kind {
            $crate::providers::ListingKind::Clients => {
                type $listing = $crate::providers::ClientsProvider<$api>;
                $body
            }
            $crate::providers::ListingKind::Partners => {
                type $listing = $crate::providers::PartnersProvider<$api>;
                $body
            }
            $crate::providers::ListingKind::PropertySubmissions => {
                type $listing = $crate::providers::PropertySubmissionsProvider<$api>;
                $body
            }
            $crate::providers::ListingKind::Appointments => {
                type $listing = $crate::providers::AppointmentsProvider<$api>;
                $body
            }
            $crate::providers::ListingKind::ShortLinks => {
                type $listing = $crate::providers::ShortLinksProvider<$api>;
                $body
            }
            $crate::providers::ListingKind::Influencers => {
                type $listing = $crate::providers::InfluencersProvider<$api>;
                $body
            }
            $crate::providers::ListingKind::Campaigns => {
                type $listing = $crate::providers::CampaignsProvider<$api>;
                $body
            }
        }
    };
}

pub(crate) use with_listing;

#[derive(Serialize)]
struct NavItem {
    name: &'static str,
    title: &'static str,
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page starts from: alerts, navigation and the signed-in user.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    session: &SessionHandle,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let navigation = ListingKind::ALL
        .into_iter()
        .map(|kind| NavItem {
            name: kind.name(),
            title: kind.title(),
        })
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("navigation", &navigation);
    context.insert("current_page", current_page);
    context.insert(
        "current_user",
        &session.current().and_then(|session| session.user_email),
    );
    context.insert("authenticated", &session.is_authenticated());
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Location of a list page with its query preserved.
pub fn listing_location(kind: ListingKind, query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        format!("/{}", kind.name())
    } else {
        format!("/{}?{query}", kind.name())
    }
}
