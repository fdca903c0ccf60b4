use std::collections::HashMap;

use serde::Serialize;
use validator::Validate;

use crate::domain::cart::{self, CartIssue, CartItem, CartLine, SyncReport};
use crate::domain::order::{NewOrder, NewOrderItem, Order};
use crate::domain::product::Product;
use crate::domain::settings::MIN_ORDER_KEY;
use crate::forms::cart::{AddToCartForm, CheckoutForm, UpdateCartForm};
use crate::repository::{
    CartStore, OrderWriter, ProductReader, SettingsReader, ShippingAreaReader,
};
use crate::services::{ServiceError, ServiceResult};

/// Cart contents as rendered by the storefront.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal_cents: i64,
    /// What reconciliation against live products changed, if anything.
    pub sync_report: SyncReport,
}

fn load_products_for<R>(repo: &R, items: &[CartItem]) -> ServiceResult<HashMap<i32, Product>>
where
    R: ProductReader + ?Sized,
{
    let mut products = HashMap::with_capacity(items.len());
    for item in items {
        if let Some(product) = repo.get_product_by_id(item.product_id)? {
            products.insert(product.id, product);
        }
    }
    Ok(products)
}

/// Load the cart, reconcile it against live products and persist the result
/// when reconciliation changed anything.
pub fn view_cart<R>(repo: &R, session_id: &str) -> ServiceResult<CartView>
where
    R: CartStore + ProductReader + ?Sized,
{
    let items = repo.load_cart(session_id)?;
    let products = load_products_for(repo, &items)?;
    let (lines, sync_report) = cart::reconcile(&items, &products);

    if sync_report.changed() {
        let reconciled: Vec<CartItem> = lines
            .iter()
            .map(|line| CartItem::new(line.product_id, line.quantity))
            .collect();
        repo.replace_cart(session_id, &reconciled)?;
    }

    Ok(CartView {
        subtotal_cents: cart::subtotal_cents(&lines),
        lines,
        sync_report,
    })
}

/// Add a product to the cart, merging with any existing line. The resulting
/// quantity is clamped to current stock.
pub fn add_to_cart<R>(repo: &R, session_id: &str, form: AddToCartForm) -> ServiceResult<()>
where
    R: CartStore + ProductReader + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = repo
        .get_product_by_id(form.product_id)?
        .filter(|product| product.is_active)
        .ok_or(ServiceError::NotFound)?;
    if product.stock_quantity == 0 {
        return Err(ServiceError::Cart(vec![CartIssue::ProductUnavailable {
            name: product.name,
        }]));
    }

    let existing = repo
        .load_cart(session_id)?
        .into_iter()
        .find(|item| item.product_id == form.product_id)
        .map(|item| item.quantity)
        .unwrap_or(0);
    let quantity = (existing + form.quantity).min(product.stock_quantity);

    repo.upsert_cart_item(session_id, &CartItem::new(form.product_id, quantity))?;
    Ok(())
}

/// Set the quantity of a cart line; zero removes the line.
pub fn update_cart_item<R>(repo: &R, session_id: &str, form: UpdateCartForm) -> ServiceResult<()>
where
    R: CartStore + ProductReader + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if form.quantity == 0 {
        repo.remove_cart_item(session_id, form.product_id)?;
        return Ok(());
    }

    let product = repo
        .get_product_by_id(form.product_id)?
        .filter(|product| product.is_active)
        .ok_or(ServiceError::NotFound)?;
    let quantity = form.quantity.min(product.stock_quantity).max(1);

    repo.upsert_cart_item(session_id, &CartItem::new(form.product_id, quantity))?;
    Ok(())
}

pub fn remove_from_cart<R>(repo: &R, session_id: &str, product_id: i32) -> ServiceResult<()>
where
    R: CartStore + ?Sized,
{
    repo.remove_cart_item(session_id, product_id)?;
    Ok(())
}

/// Turn the cart into a pending order.
///
/// Checkout never touches stock; the deduction is booked when the order is
/// confirmed. Stale carts fail validation instead of being silently clamped,
/// so the customer always sees what they are about to order.
pub fn checkout<R>(repo: &R, session_id: &str, mut form: CheckoutForm) -> ServiceResult<Order>
where
    R: CartStore + ProductReader + SettingsReader + ShippingAreaReader + OrderWriter + ?Sized,
{
    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let payment_method = form
        .payment_method()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let items = repo.load_cart(session_id)?;
    let products = load_products_for(repo, &items)?;

    let mut issues = Vec::new();
    let mut lines: Vec<CartLine> = Vec::with_capacity(items.len());
    for item in &items {
        match products.get(&item.product_id).filter(|p| p.is_active) {
            Some(product) => {
                let unit_price_cents = product.effective_price_cents();
                lines.push(CartLine {
                    product_id: product.id,
                    name: product.name.clone(),
                    sku: product.sku.clone(),
                    unit_price_cents,
                    quantity: item.quantity,
                    line_total_cents: unit_price_cents * i64::from(item.quantity),
                    available_stock: product.stock_quantity,
                });
            }
            None => issues.push(CartIssue::ProductUnavailable {
                name: products
                    .get(&item.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("product #{}", item.product_id)),
            }),
        }
    }

    let minimum_cents = repo
        .get_setting(MIN_ORDER_KEY)?
        .and_then(|setting| setting.as_cents())
        .unwrap_or(0);
    issues.extend(cart::validate(&lines, minimum_cents));
    if !issues.is_empty() {
        return Err(ServiceError::Cart(issues));
    }

    let order_items = lines
        .iter()
        .map(|line| {
            NewOrderItem::new(
                line.product_id,
                line.name.clone(),
                line.sku.clone(),
                line.unit_price_cents,
                line.quantity,
            )
        })
        .collect();

    let mut new_order = NewOrder::new(
        form.customer_name,
        form.customer_email,
        form.customer_phone,
        form.shipping_address,
        payment_method,
        order_items,
    );
    if let Some(area_id) = form.shipping_area_id {
        let area = repo
            .get_shipping_area_by_id(area_id)?
            .filter(|area| area.is_active)
            .ok_or_else(|| {
                ServiceError::Form("the selected delivery area is not available".to_string())
            })?;
        new_order = new_order.with_shipping(area.id, area.shipping_cost_cents);
    }

    let order = repo.create_order(&new_order)?;
    repo.clear_cart(session_id)?;
    log::info!(
        "order {} placed for {} ({} cents)",
        order.order_number,
        order.customer_email,
        order.total_cents
    );

    Ok(order)
}
