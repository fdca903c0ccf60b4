use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::cart::{AddToCartForm, CheckoutForm, UpdateCartForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, cart_session_id, redirect, render_template};
use crate::services::ServiceError;
use crate::services::cart::{add_to_cart, checkout, remove_from_cart, update_cart_item, view_cart};
use crate::services::shipping::list_active_areas;

#[get("/cart")]
pub async fn show_cart(
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let session_id = cart_session_id(&session);

    match view_cart(repo.get_ref(), &session_id) {
        Ok(view) => {
            if view.sync_report.changed() {
                for name in &view.sync_report.dropped {
                    FlashMessage::warning(format!("`{name}` was removed from your cart.")).send();
                }
                for name in &view.sync_report.clamped {
                    FlashMessage::warning(format!(
                        "The quantity of `{name}` was reduced to the available stock."
                    ))
                    .send();
                }
            }
            let mut context = base_context(&flash_messages, "cart");
            context.insert("cart", &view);
            render_template(&tera, "cart/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/add")]
pub async fn add_cart_item(
    session: Session,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddToCartForm>,
) -> impl Responder {
    let session_id = cart_session_id(&session);
    let product_id = form.product_id;

    match add_to_cart(repo.get_ref(), &session_id, form.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Added to cart.").send();
            redirect("/cart")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("This product is no longer available.").send();
            redirect("/catalog")
        }
        Err(ServiceError::Cart(issues)) => {
            for issue in issues {
                FlashMessage::error(issue.to_string()).send();
            }
            redirect(&format!("/product/{product_id}"))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/product/{product_id}"))
        }
        Err(err) => {
            log::error!("Failed to add product {product_id} to the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/update")]
pub async fn change_cart_item(
    session: Session,
    repo: web::Data<DieselRepository>,
    form: web::Form<UpdateCartForm>,
) -> impl Responder {
    let session_id = cart_session_id(&session);

    match update_cart_item(repo.get_ref(), &session_id, form.into_inner()) {
        Ok(()) => redirect("/cart"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("This product is no longer available.").send();
            redirect("/cart")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/cart")
        }
        Err(err) => {
            log::error!("Failed to update the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/{product_id}/remove")]
pub async fn remove_cart_item(
    path: web::Path<i32>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let session_id = cart_session_id(&session);
    let product_id = path.into_inner();

    match remove_from_cart(repo.get_ref(), &session_id, product_id) {
        Ok(()) => redirect("/cart"),
        Err(err) => {
            log::error!("Failed to remove product {product_id} from the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/checkout")]
pub async fn show_checkout(
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let session_id = cart_session_id(&session);

    let view = match view_cart(repo.get_ref(), &session_id) {
        Ok(view) => view,
        Err(err) => {
            log::error!("Failed to load the cart for checkout: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    if view.lines.is_empty() {
        FlashMessage::warning("Your cart is empty.").send();
        return redirect("/cart");
    }
    let areas = match list_active_areas(repo.get_ref()) {
        Ok(areas) => areas,
        Err(err) => {
            log::error!("Failed to load delivery areas: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, "checkout");
    context.insert("cart", &view);
    context.insert("shipping_areas", &areas);
    render_template(&tera, "cart/checkout.html", &context)
}

#[post("/checkout")]
pub async fn place_order(
    session: Session,
    repo: web::Data<DieselRepository>,
    form: web::Form<CheckoutForm>,
) -> impl Responder {
    let session_id = cart_session_id(&session);

    match checkout(repo.get_ref(), &session_id, form.into_inner()) {
        Ok(order) => {
            FlashMessage::success(format!(
                "Thank you! Your order {} has been received.",
                order.order_number
            ))
            .send();
            redirect(&format!("/order/{}/placed", order.order_number))
        }
        Err(ServiceError::Cart(issues)) => {
            for issue in issues {
                FlashMessage::error(issue.to_string()).send();
            }
            redirect("/cart")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/checkout")
        }
        Err(err) => {
            log::error!("Failed to place an order: {err}");
            FlashMessage::error("Something went wrong while placing your order.").send();
            redirect("/checkout")
        }
    }
}

#[get("/order/{order_number}/placed")]
pub async fn show_order_placed(
    path: web::Path<String>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_number = path.into_inner();

    let mut context = base_context(&flash_messages, "checkout");
    context.insert("order_number", &order_number);
    render_template(&tera, "cart/placed.html", &context)
}
