use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedAdmin;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::reports::{OrdersReportQuery, low_stock_products, orders_csv};

#[derive(Deserialize)]
pub struct ExportParams {
    pub status: Option<String>,
    pub q: Option<String>,
}

#[get("/admin/reports/orders.csv")]
pub async fn export_orders(
    params: web::Query<ExportParams>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = OrdersReportQuery {
        status: params.status,
        search: params.q,
    };

    match orders_csv(repo.get_ref(), &admin, query) {
        Ok(bytes) => {
            let file_name = format!("orders-{}.csv", Local::now().format("%Y%m%d"));
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{file_name}\""),
                ))
                .body(bytes)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/orders")
        }
        Err(err) => {
            log::error!("Failed to export orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/reports/low-stock")]
pub async fn show_low_stock(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match low_stock_products(repo.get_ref(), &admin) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, "reports");
            context.insert("admin", &admin);
            context.insert("products", &products);
            render_template(&tera, "reports/low_stock.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(err) => {
            log::error!("Failed to load the low stock report: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
