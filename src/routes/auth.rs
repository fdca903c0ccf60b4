use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::AuthenticatedAdmin;
use crate::config::ServerConfig;
use crate::forms::auth::LoginForm;
use crate::routes::{base_context, redirect, render_template};

#[get("/admin/login")]
pub async fn show_login(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/admin/login")]
pub async fn login(
    req: HttpRequest,
    config: web::Data<ServerConfig>,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let mut form = form.into_inner();
    form.sanitize();
    if form.validate().is_err() {
        FlashMessage::error("Enter your email and password.").send();
        return redirect("/admin/login");
    }

    if form.email != config.admin_email || form.password != config.admin_password {
        FlashMessage::error("Invalid credentials.").send();
        return redirect("/admin/login");
    }

    let admin = AuthenticatedAdmin {
        email: config.admin_email.clone(),
        name: config.admin_name.clone(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
    };
    let stored = match admin.to_identity_string() {
        Ok(stored) => stored,
        Err(err) => {
            log::error!("Failed to serialize the identity: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    if let Err(err) = Identity::login(&req.extensions(), stored) {
        log::error!("Failed to log in: {err}");
        return HttpResponse::InternalServerError().finish();
    }

    redirect("/admin/orders")
}

#[get("/admin/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}
