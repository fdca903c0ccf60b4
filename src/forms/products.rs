use serde::Deserialize;
use validator::Validate;

use crate::domain::category::{NewCategory, UpdateCategory};
use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{parse_price_cents, sanitize_inline_text, sanitize_multiline_text, sanitize_sku};

/// Back-office payload for creating or editing a product.
///
/// Prices arrive as decimal strings (`"12.34"`) and are converted to cents.
/// `stock_quantity` is only honoured on create, where it becomes the opening
/// stock; edits move stock through the ledger instead.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 64, message = "SKU is required"))]
    pub sku: String,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub discount_price: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub min_stock: i32,
    pub category_id: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

impl ProductForm {
    pub fn sanitize(&mut self) {
        self.sku = sanitize_sku(&self.sku);
        self.name = sanitize_inline_text(&self.name);
        self.description = self
            .description
            .take()
            .map(|value| sanitize_multiline_text(&value))
            .filter(|value| !value.is_empty());
    }

    fn prices(&self) -> Result<(i64, Option<i64>), String> {
        let price_cents =
            parse_price_cents(&self.price).ok_or_else(|| "Invalid price".to_string())?;
        let discount_price_cents = match self
            .discount_price
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            Some(value) => {
                Some(parse_price_cents(value).ok_or_else(|| "Invalid discount price".to_string())?)
            }
            None => None,
        };

        if matches!(discount_price_cents, Some(discount) if discount >= price_cents) {
            return Err("Discount price must be below the regular price".to_string());
        }
        if self.stock_quantity < 0 || self.min_stock < 0 {
            return Err("Stock levels cannot be negative".to_string());
        }

        Ok((price_cents, discount_price_cents))
    }

    /// Convert into an insert payload; `stock_quantity` becomes opening stock.
    pub fn into_new_product(self) -> Result<NewProduct, String> {
        let (price_cents, discount_price_cents) = self.prices()?;

        let mut new_product = NewProduct::new(self.sku, self.name, price_cents)
            .with_stock(self.stock_quantity)
            .with_min_stock(self.min_stock);
        if let Some(description) = self.description {
            new_product = new_product.with_description(description);
        }
        if let Some(discount) = discount_price_cents {
            new_product = new_product.with_discount_price(discount);
        }
        if let Some(category_id) = self.category_id {
            new_product = new_product.with_category(category_id);
        }
        new_product.is_active = self.is_active;
        if self.is_featured {
            new_product = new_product.featured();
        }

        Ok(new_product)
    }

    /// Convert into a patch; the stock field is ignored.
    pub fn into_update(self) -> Result<UpdateProduct, String> {
        let (price_cents, discount_price_cents) = self.prices()?;

        Ok(UpdateProduct::new()
            .sku(self.sku)
            .name(self.name)
            .description(self.description)
            .price_cents(price_cents)
            .discount_price_cents(discount_price_cents)
            .min_stock(self.min_stock)
            .category_id(self.category_id)
            .active(self.is_active)
            .featured(self.is_featured))
    }
}

/// Back-office payload for creating or editing a category.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

impl CategoryForm {
    pub fn sanitize(&mut self) {
        self.name = sanitize_inline_text(&self.name);
        self.description = self
            .description
            .take()
            .map(|value| sanitize_multiline_text(&value))
            .filter(|value| !value.is_empty());
    }

    pub fn into_new_category(self) -> NewCategory {
        let mut new_category = NewCategory::new(self.name);
        if let Some(description) = self.description {
            new_category = new_category.with_description(description);
        }
        new_category
    }

    pub fn into_update(self) -> UpdateCategory {
        UpdateCategory::new(self.name)
            .description(self.description)
            .archived(self.is_archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            sku: " RICE-5KG ".to_string(),
            name: "  Basmati   Rice ".to_string(),
            description: Some("\nLong grain.\n\n\nImported.\n".to_string()),
            price: "12.50".to_string(),
            discount_price: Some("9.99".to_string()),
            stock_quantity: 40,
            min_stock: 5,
            category_id: Some(2),
            is_active: true,
            is_featured: true,
        }
    }

    #[test]
    fn new_product_conversion_parses_prices_into_cents() {
        let mut form = form();
        form.sanitize();

        let new_product = form.into_new_product().expect("valid form");

        assert_eq!(new_product.sku, "RICE-5KG");
        assert_eq!(new_product.name, "Basmati Rice");
        assert_eq!(new_product.description.as_deref(), Some("Long grain.\n\nImported."));
        assert_eq!(new_product.price_cents, 1250);
        assert_eq!(new_product.discount_price_cents, Some(999));
        assert_eq!(new_product.stock_quantity, 40);
        assert!(new_product.is_featured);
    }

    #[test]
    fn discount_must_stay_below_the_regular_price() {
        let mut form = form();
        form.discount_price = Some("12.50".to_string());

        assert!(form.clone().into_new_product().is_err());
        assert!(form.into_update().is_err());
    }

    #[test]
    fn update_conversion_carries_no_stock_quantity() {
        let update = form().into_update().expect("valid form");

        assert_eq!(update.price_cents, Some(1250));
        assert_eq!(update.min_stock, Some(5));
        assert_eq!(update.category_id, Some(Some(2)));
    }
}
