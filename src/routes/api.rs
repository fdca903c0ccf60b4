use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::forms::cart::{AddToCartForm, UpdateCartForm};
use crate::repository::DieselRepository;
use crate::routes::cart_session_id;
use crate::services::ServiceError;
use crate::services::cart::{add_to_cart, update_cart_item, view_cart};
use crate::services::catalog::{CatalogQuery, browse_catalog};

#[derive(serde::Deserialize)]
pub struct ProductsParams {
    pub q: Option<String>,
    pub category: Option<i32>,
    pub page: Option<usize>,
}

/// JSON product search used by the storefront autocomplete.
#[get("/api/v1/products")]
pub async fn api_v1_products(
    params: web::Query<ProductsParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CatalogQuery {
        search: params.q,
        category_id: params.category,
        page: params.page,
    };

    match browse_catalog(repo.get_ref(), query) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => {
            log::error!("Failed to search products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Current cart contents for the mini-cart widget.
#[get("/api/v1/cart")]
pub async fn api_v1_cart(session: Session, repo: web::Data<DieselRepository>) -> impl Responder {
    let session_id = cart_session_id(&session);

    match view_cart(repo.get_ref(), &session_id) {
        Ok(view) => HttpResponse::Ok().json(json!({ "success": true, "cart": view })),
        Err(err) => {
            log::error!("Failed to load the cart: {err}");
            HttpResponse::InternalServerError().json(json!({ "success": false }))
        }
    }
}

/// AJAX add-to-cart used by the catalog cards.
#[post("/api/v1/cart/add")]
pub async fn api_v1_cart_add(
    session: Session,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddToCartForm>,
) -> impl Responder {
    let session_id = cart_session_id(&session);

    match add_to_cart(repo.get_ref(), &session_id, form.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "product not available",
        })),
        Err(ServiceError::Cart(issues)) => HttpResponse::UnprocessableEntity().json(json!({
            "success": false,
            "issues": issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
        })),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": message,
        })),
        Err(err) => {
            log::error!("Failed to add to the cart: {err}");
            HttpResponse::InternalServerError().json(json!({ "success": false }))
        }
    }
}

/// AJAX quantity update used by the cart page.
#[post("/api/v1/cart/update")]
pub async fn api_v1_cart_update(
    session: Session,
    repo: web::Data<DieselRepository>,
    form: web::Json<UpdateCartForm>,
) -> impl Responder {
    let session_id = cart_session_id(&session);

    match update_cart_item(repo.get_ref(), &session_id, form.into_inner()) {
        Ok(()) => match view_cart(repo.get_ref(), &session_id) {
            Ok(view) => HttpResponse::Ok().json(json!({ "success": true, "cart": view })),
            Err(err) => {
                log::error!("Failed to reload the cart: {err}");
                HttpResponse::InternalServerError().json(json!({ "success": false }))
            }
        },
        Err(ServiceError::NotFound) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "product not available",
        })),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": message,
        })),
        Err(err) => {
            log::error!("Failed to update the cart: {err}");
            HttpResponse::InternalServerError().json(json!({ "success": false }))
        }
    }
}
