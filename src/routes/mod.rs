use actix_session::Session;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Serialize;
use tera::{Context, Tera};
use uuid::Uuid;

pub mod api;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod main;
pub mod orders;
pub mod products;
pub mod reports;
pub mod settings;
pub mod shipping;
pub mod stock;

/// Session key holding the anonymous cart identifier.
const CART_SESSION_KEY: &str = "cart_id";

#[derive(Serialize)]
struct Alert<'a> {
    level: &'static str,
    message: &'a str,
}

/// Render a template or log the failure and answer with a 500.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// 303 redirect to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Shared template context: flash alerts and the active navigation entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: match message.level() {
                actix_web_flash_messages::Level::Error => "danger",
                actix_web_flash_messages::Level::Warning => "warning",
                actix_web_flash_messages::Level::Success => "success",
                _ => "info",
            },
            message: message.content(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// The cart identifier for this browser session, created on first use.
pub fn cart_session_id(session: &Session) -> String {
    if let Ok(Some(existing)) = session.get::<String>(CART_SESSION_KEY) {
        return existing;
    }

    let generated = Uuid::new_v4().to_string();
    if let Err(err) = session.insert(CART_SESSION_KEY, &generated) {
        log::error!("Failed to store cart session id: {err}");
    }
    generated
}
