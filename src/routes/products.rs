use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedAdmin;
use crate::forms::products::ProductForm;
use crate::forms::stock::AdjustStockForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::catalog::{
    AdminProductQuery, create_product, delete_product, list_categories, list_products,
    load_product, update_product,
};
use crate::services::stock::adjust_stock;
use crate::services::{ServiceError, ServiceResult};

#[derive(Deserialize)]
pub struct ProductListParams {
    pub q: Option<String>,
    pub category: Option<i32>,
    #[serde(default)]
    pub low_stock: bool,
    pub page: Option<usize>,
}

fn categories_for_form(
    repo: &DieselRepository,
    admin: &AuthenticatedAdmin,
) -> ServiceResult<Vec<crate::domain::category::Category>> {
    list_categories(repo, admin, false)
}

#[get("/admin/products")]
pub async fn show_products(
    params: web::Query<ProductListParams>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = AdminProductQuery {
        search: params.q.clone(),
        category_id: params.category,
        low_stock_only: params.low_stock,
        page: params.page,
    };

    match list_products(repo.get_ref(), &admin, query) {
        Ok(products) => {
            let categories = match categories_for_form(repo.get_ref(), &admin) {
                Ok(categories) => categories,
                Err(err) => {
                    log::error!("Failed to list categories: {err}");
                    Vec::new()
                }
            };
            let mut context = base_context(&flash_messages, "products");
            context.insert("admin", &admin);
            context.insert("products", &products);
            context.insert("categories", &categories);
            context.insert("search", &params.q);
            context.insert("low_stock", &params.low_stock);
            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/{product_id}")]
pub async fn show_product(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = path.into_inner();

    match load_product(repo.get_ref(), &admin, product_id) {
        Ok(product) => {
            let categories = match categories_for_form(repo.get_ref(), &admin) {
                Ok(categories) => categories,
                Err(err) => {
                    log::error!("Failed to list categories: {err}");
                    Vec::new()
                }
            };
            let mut context = base_context(&flash_messages, "products");
            context.insert("admin", &admin);
            context.insert("product", &product);
            context.insert("categories", &categories);
            render_template(&tera, "products/edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load product {product_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/add")]
pub async fn add_product(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<ProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), &admin, form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Product `{}` created.", product.name)).send();
            redirect("/admin/products")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/products")
        }
        Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to create a product: {err}");
            FlashMessage::error("The product could not be created.").send();
            redirect("/admin/products")
        }
    }
}

#[post("/admin/products/{product_id}/edit")]
pub async fn edit_product(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<ProductForm>,
) -> impl Responder {
    let product_id = path.into_inner();

    match update_product(repo.get_ref(), &admin, product_id, form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Product `{}` updated.", product.name)).send();
            redirect(&format!("/admin/products/{product_id}"))
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/admin/products/{product_id}"))
        }
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            FlashMessage::error("The product could not be updated.").send();
            redirect(&format!("/admin/products/{product_id}"))
        }
    }
}

#[post("/admin/products/{product_id}/delete")]
pub async fn remove_product(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match delete_product(repo.get_ref(), &admin, product_id) {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("The product could not be deleted.").send();
            redirect("/admin/products")
        }
    }
}

#[post("/admin/products/{product_id}/stock")]
pub async fn adjust_product_stock(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<AdjustStockForm>,
) -> impl Responder {
    let product_id = path.into_inner();

    match adjust_stock(repo.get_ref(), &admin, product_id, form.into_inner()) {
        Ok(movement) => {
            FlashMessage::success(format!(
                "Stock adjusted; {} units now on hand.",
                movement.current_stock
            ))
            .send();
            redirect(&format!("/admin/products/{product_id}"))
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Unknown product.").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/admin/products/{product_id}"))
        }
        Err(err) => {
            log::error!("Failed to adjust stock of product {product_id}: {err}");
            FlashMessage::error("The stock level could not be adjusted.").send();
            redirect(&format!("/admin/products/{product_id}"))
        }
    }
}
