use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Domain representation of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Unique stock keeping unit identifier.
    pub sku: String,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to customers.
    pub description: Option<String>,
    /// Regular price in cents.
    pub price_cents: i64,
    /// Optional discounted price in cents; always below the regular price.
    pub discount_price_cents: Option<i64>,
    /// Units on hand. Written only through the stock ledger.
    pub stock_quantity: i32,
    /// Reorder threshold for the low-stock report.
    pub min_stock: i32,
    /// Optional owning category.
    pub category_id: Option<i32>,
    /// Whether the product is visible on the storefront.
    pub is_active: bool,
    /// Whether the product is highlighted on the index page.
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Price the customer actually pays: the discount when one is set.
    pub fn effective_price_cents(&self) -> i64 {
        self.discount_price_cents.unwrap_or(self.price_cents)
    }

    /// Whether stock has fallen to or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock
    }
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub discount_price_cents: Option<i64>,
    /// Opening stock; recorded as an adjustment ledger entry on insert.
    pub stock_quantity: i32,
    pub min_stock: i32,
    pub category_id: Option<i32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            description: None,
            price_cents,
            discount_price_cents: None,
            stock_quantity: 0,
            min_stock: 0,
            category_id: None,
            is_active: true,
            is_featured: false,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_discount_price(mut self, discount_price_cents: i64) -> Self {
        self.discount_price_cents = Some(discount_price_cents);
        self
    }

    /// Set the opening stock level.
    pub fn with_stock(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    pub fn with_min_stock(mut self, min_stock: i32) -> Self {
        self.min_stock = min_stock;
        self
    }

    pub fn with_category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }
}

/// Patch data applied when updating an existing product.
///
/// Deliberately has no stock field: stock moves only through the ledger.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub sku: Option<String>,
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    /// `Some(None)` removes the discount.
    pub discount_price_cents: Option<Option<i64>>,
    pub min_stock: Option<i32>,
    /// `Some(None)` detaches the category.
    pub category_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            sku: None,
            name: None,
            description: None,
            price_cents: None,
            discount_price_cents: None,
            min_stock: None,
            category_id: None,
            is_active: None,
            is_featured: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    pub fn discount_price_cents(mut self, discount_price_cents: Option<i64>) -> Self {
        self.discount_price_cents = Some(discount_price_cents);
        self
    }

    pub fn min_stock(mut self, min_stock: i32) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    pub fn category_id(mut self, category_id: Option<i32>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional name or SKU search term.
    pub search: Option<String>,
    /// Optional category filter.
    pub category_id: Option<i32>,
    /// Only products visible on the storefront.
    pub active_only: bool,
    /// Only products highlighted on the index page.
    pub featured_only: bool,
    /// Only products at or below their reorder threshold.
    pub low_stock_only: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to the name or SKU.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured_only = true;
        self
    }

    pub fn low_stock_only(mut self) -> Self {
        self.low_stock_only = true;
        self
    }

    /// Apply pagination with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
