use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::catalog::{CatalogQuery, browse_catalog, load_storefront_index, view_product};
use crate::services::{ServiceError, shipping as shipping_service};

#[derive(Deserialize)]
pub struct CatalogParams {
    pub q: Option<String>,
    pub category: Option<i32>,
    pub page: Option<usize>,
}

#[get("/")]
pub async fn show_index(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_storefront_index(repo.get_ref()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "index");
            context.insert("featured", &data.featured);
            context.insert("categories", &data.categories);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/catalog")]
pub async fn show_catalog(
    params: web::Query<CatalogParams>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CatalogQuery {
        search: params.q.clone(),
        category_id: params.category,
        page: params.page,
    };

    match browse_catalog(repo.get_ref(), query) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, "catalog");
            context.insert("products", &products);
            context.insert("search", &params.q);
            context.insert("category", &params.category);
            render_template(&tera, "main/catalog.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the catalog: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/product/{product_id}")]
pub async fn show_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = path.into_inner();

    match view_product(repo.get_ref(), product_id) {
        Ok(product) => {
            let areas = match shipping_service::list_active_areas(repo.get_ref()) {
                Ok(areas) => areas,
                Err(err) => {
                    log::error!("Failed to load delivery areas: {err}");
                    Vec::new()
                }
            };
            let mut context = base_context(&flash_messages, "catalog");
            context.insert("product", &product);
            context.insert("shipping_areas", &areas);
            render_template(&tera, "main/product.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load product {product_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
