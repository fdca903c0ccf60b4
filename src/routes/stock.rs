use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedAdmin;
use crate::forms::stock::StockHistoryQueryForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::stock::stock_history;

#[get("/admin/stock")]
pub async fn show_stock_history(
    params: web::Query<StockHistoryQueryForm>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let product_id = params.product_id;
    let reference = params.reference.clone();

    match stock_history(repo.get_ref(), &admin, params) {
        Ok(movements) => {
            let mut context = base_context(&flash_messages, "stock");
            context.insert("admin", &admin);
            context.insert("movements", &movements);
            context.insert("product_id", &product_id);
            context.insert("reference", &reference);
            render_template(&tera, "stock/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/stock")
        }
        Err(err) => {
            log::error!("Failed to load the stock history: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
