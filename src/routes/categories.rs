use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedAdmin;
use crate::forms::products::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::catalog::{
    create_category, delete_category, list_categories, update_category,
};

#[get("/admin/categories")]
pub async fn show_categories(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_categories(repo.get_ref(), &admin, true) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("admin", &admin);
            context.insert("categories", &categories);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(err) => {
            log::error!("Failed to list categories: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/categories/add")]
pub async fn add_category(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<CategoryForm>,
) -> impl Responder {
    match create_category(repo.get_ref(), &admin, form.into_inner()) {
        Ok(category) => {
            FlashMessage::success(format!("Category `{}` created.", category.name)).send();
            redirect("/admin/categories")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/categories")
        }
        Err(err) => {
            log::error!("Failed to create a category: {err}");
            FlashMessage::error("The category could not be created.").send();
            redirect("/admin/categories")
        }
    }
}

#[post("/admin/categories/{category_id}/edit")]
pub async fn edit_category(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<CategoryForm>,
) -> impl Responder {
    let category_id = path.into_inner();

    match update_category(repo.get_ref(), &admin, category_id, form.into_inner()) {
        Ok(category) => {
            FlashMessage::success(format!("Category `{}` updated.", category.name)).send();
            redirect("/admin/categories")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/categories")
        }
        Err(err) => {
            log::error!("Failed to update category {category_id}: {err}");
            FlashMessage::error("The category could not be updated.").send();
            redirect("/admin/categories")
        }
    }
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn remove_category(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = path.into_inner();

    match delete_category(repo.get_ref(), &admin, category_id) {
        Ok(()) => {
            FlashMessage::success("Category deleted; its products are now uncategorized.").send();
            redirect("/admin/categories")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to delete category {category_id}: {err}");
            FlashMessage::error("The category could not be deleted.").send();
            redirect("/admin/categories")
        }
    }
}
