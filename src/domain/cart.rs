use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::Product;

/// One line of a session-scoped cart, as persisted by the cart store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CartItem {
    pub product_id: i32,
    pub quantity: i32,
    pub added_at: NaiveDateTime,
}

impl CartItem {
    pub fn new(product_id: i32, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
            added_at: chrono::Local::now().naive_utc(),
        }
    }
}

/// A cart line joined against the live product record.
#[derive(Debug, Serialize, Clone)]
pub struct CartLine {
    pub product_id: i32,
    pub name: String,
    pub sku: String,
    /// Effective (possibly discounted) unit price in cents.
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
    /// Units currently on hand, echoed for the quantity selector.
    pub available_stock: i32,
}

/// What `sync` changed while reconciling a stale cart.
#[derive(Debug, Default, Serialize, Clone)]
pub struct SyncReport {
    /// Names of products dropped because they vanished or were deactivated.
    pub dropped: Vec<String>,
    /// Names of products whose quantity was clamped down to current stock.
    pub clamped: Vec<String>,
}

impl SyncReport {
    /// Whether the reconciliation changed anything.
    pub fn changed(&self) -> bool {
        !self.dropped.is_empty() || !self.clamped.is_empty()
    }
}

/// Structured pre-checkout findings; replaces the string lists the storefront
/// used to pattern-match on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartIssue {
    #[error("the cart is empty")]
    EmptyCart,
    #[error("order total {subtotal_cents} is below the minimum of {minimum_cents}")]
    BelowMinimum {
        minimum_cents: i64,
        subtotal_cents: i64,
    },
    #[error("`{name}` is no longer available")]
    ProductUnavailable { name: String },
    #[error("only {available} of `{name}` in stock, {requested} requested")]
    InsufficientStock {
        name: String,
        requested: i32,
        available: i32,
    },
}

/// Reconciles persisted cart items against the current product records.
///
/// Missing and inactive products are dropped, quantities above current stock
/// are clamped down (to at least zero, dropping the line when stock is gone).
/// Returns the surviving lines priced at the current effective price and a
/// report of what changed.
pub fn reconcile(
    items: &[CartItem],
    products: &HashMap<i32, Product>,
) -> (Vec<CartLine>, SyncReport) {
    let mut lines = Vec::with_capacity(items.len());
    let mut report = SyncReport::default();

    for item in items {
        let Some(product) = products.get(&item.product_id).filter(|p| p.is_active) else {
            let name = products
                .get(&item.product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("product #{}", item.product_id));
            report.dropped.push(name);
            continue;
        };

        let quantity = if item.quantity > product.stock_quantity {
            if product.stock_quantity == 0 {
                report.dropped.push(product.name.clone());
                continue;
            }
            report.clamped.push(product.name.clone());
            product.stock_quantity
        } else {
            item.quantity
        };

        let unit_price_cents = product.effective_price_cents();
        lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            unit_price_cents,
            quantity,
            line_total_cents: unit_price_cents * i64::from(quantity),
            available_stock: product.stock_quantity,
        });
    }

    (lines, report)
}

/// Sum of line totals in cents.
pub fn subtotal_cents(lines: &[CartLine]) -> i64 {
    lines.iter().map(|line| line.line_total_cents).sum()
}

/// Pre-checkout validation: minimum order amount plus per-line stock checks.
pub fn validate(lines: &[CartLine], minimum_cents: i64) -> Vec<CartIssue> {
    let mut issues = Vec::new();

    if lines.is_empty() {
        issues.push(CartIssue::EmptyCart);
        return issues;
    }

    let subtotal = subtotal_cents(lines);
    if subtotal < minimum_cents {
        issues.push(CartIssue::BelowMinimum {
            minimum_cents,
            subtotal_cents: subtotal,
        });
    }

    for line in lines {
        if line.available_stock == 0 {
            issues.push(CartIssue::ProductUnavailable {
                name: line.name.clone(),
            });
        } else if line.quantity > line.available_stock {
            issues.push(CartIssue::InsufficientStock {
                name: line.name.clone(),
                requested: line.quantity,
                available: line.available_stock,
            });
        }
    }

    issues
}
