use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedAdmin;
use crate::forms::shipping::ShippingAreaForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::shipping::{create_area, delete_area, list_areas, update_area};

#[get("/admin/shipping")]
pub async fn show_shipping_areas(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_areas(repo.get_ref(), &admin) {
        Ok(areas) => {
            let mut context = base_context(&flash_messages, "shipping");
            context.insert("admin", &admin);
            context.insert("areas", &areas);
            render_template(&tera, "shipping/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(err) => {
            log::error!("Failed to list delivery areas: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/shipping/add")]
pub async fn add_shipping_area(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<ShippingAreaForm>,
) -> impl Responder {
    match create_area(repo.get_ref(), &admin, form.into_inner()) {
        Ok(area) => {
            FlashMessage::success(format!("Delivery area `{}` created.", area.name)).send();
            redirect("/admin/shipping")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/shipping")
        }
        Err(err) => {
            log::error!("Failed to create a delivery area: {err}");
            FlashMessage::error("The delivery area could not be created.").send();
            redirect("/admin/shipping")
        }
    }
}

#[post("/admin/shipping/{area_id}/edit")]
pub async fn edit_shipping_area(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<ShippingAreaForm>,
) -> impl Responder {
    let area_id = path.into_inner();

    match update_area(repo.get_ref(), &admin, area_id, form.into_inner()) {
        Ok(area) => {
            FlashMessage::success(format!("Delivery area `{}` updated.", area.name)).send();
            redirect("/admin/shipping")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/shipping")
        }
        Err(err) => {
            log::error!("Failed to update delivery area {area_id}: {err}");
            FlashMessage::error("The delivery area could not be updated.").send();
            redirect("/admin/shipping")
        }
    }
}

#[post("/admin/shipping/{area_id}/delete")]
pub async fn remove_shipping_area(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let area_id = path.into_inner();

    match delete_area(repo.get_ref(), &admin, area_id) {
        Ok(()) => {
            FlashMessage::success("Delivery area deleted.").send();
            redirect("/admin/shipping")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/shipping")
        }
        Err(err) => {
            log::error!("Failed to delete delivery area {area_id}: {err}");
            FlashMessage::error("The delivery area could not be deleted.").send();
            redirect("/admin/shipping")
        }
    }
}
