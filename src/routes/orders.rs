use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedAdmin;
use crate::forms::orders::TransitionOrderForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::orders::{
    OrdersQuery, delete_pending_order, load_order, load_orders_page, transition_order,
};

#[get("/admin/orders")]
pub async fn show_orders(
    params: web::Query<OrdersQuery>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_orders_page(repo.get_ref(), &admin, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "orders");
            context.insert("admin", &admin);
            context.insert("orders", &data.orders);
            context.insert("status", &data.status);
            context.insert("search", &data.search);
            render_template(&tera, "orders/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/orders")
        }
        Err(err) => {
            log::error!("Failed to list orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/orders/{order_id}")]
pub async fn show_order(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_id = path.into_inner();

    match load_order(repo.get_ref(), &admin, order_id) {
        Ok(order) => {
            let next_statuses: Vec<&str> = order
                .order_status
                .allowed_transitions()
                .iter()
                .map(|status| status.as_str())
                .collect();
            let mut context = base_context(&flash_messages, "orders");
            context.insert("admin", &admin);
            context.insert("order", &order);
            context.insert("next_statuses", &next_statuses);
            render_template(&tera, "orders/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load order {order_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/orders/{order_id}/status")]
pub async fn update_order_status(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<TransitionOrderForm>,
) -> impl Responder {
    let order_id = path.into_inner();

    match transition_order(repo.get_ref(), &admin, order_id, form.into_inner()) {
        Ok(order) => {
            FlashMessage::success(format!(
                "Order {} is now {}.",
                order.order_number, order.order_status
            ))
            .send();
            redirect(&format!("/admin/orders/{order_id}"))
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::InvalidTransition(err)) => {
            FlashMessage::error(err.to_string()).send();
            redirect(&format!("/admin/orders/{order_id}"))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/admin/orders/{order_id}"))
        }
        Err(err) => {
            log::error!("Failed to update order {order_id}: {err}");
            FlashMessage::error("The order could not be updated.").send();
            redirect(&format!("/admin/orders/{order_id}"))
        }
    }
}

#[post("/admin/orders/{order_id}/delete")]
pub async fn delete_order(
    path: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();

    match delete_pending_order(repo.get_ref(), &admin, order_id) {
        Ok(()) => {
            FlashMessage::success("Order deleted.").send();
            redirect("/admin/orders")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/admin/orders/{order_id}"))
        }
        Err(err) => {
            log::error!("Failed to delete order {order_id}: {err}");
            FlashMessage::error("The order could not be deleted.").send();
            redirect("/admin/orders")
        }
    }
}
