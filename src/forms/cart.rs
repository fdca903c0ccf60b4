use serde::Deserialize;
use validator::Validate;

use crate::domain::order::{PaymentMethod, UnknownStatus};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Storefront request to put a product into the cart.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct AddToCartForm {
    pub product_id: i32,
    #[validate(range(min = 1, max = 999, message = "Quantity must be between 1 and 999"))]
    pub quantity: i32,
}

/// Storefront request to change the quantity of a cart line.
/// A quantity of zero removes the line.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct UpdateCartForm {
    pub product_id: i32,
    #[validate(range(min = 0, max = 999, message = "Quantity must be between 0 and 999"))]
    pub quantity: i32,
}

/// Checkout details collected from the customer.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct CheckoutForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub customer_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub customer_email: String,
    #[validate(length(min = 5, max = 32, message = "A phone number is required"))]
    pub customer_phone: String,
    #[validate(length(min = 5, max = 500, message = "A delivery address is required"))]
    pub shipping_address: String,
    pub shipping_area_id: Option<i32>,
    pub payment_method: String,
}

impl CheckoutForm {
    /// Normalize free-text fields before validation.
    pub fn sanitize(&mut self) {
        self.customer_name = sanitize_inline_text(&self.customer_name);
        self.customer_email = sanitize_inline_text(&self.customer_email).to_lowercase();
        self.customer_phone = sanitize_inline_text(&self.customer_phone);
        self.shipping_address = sanitize_multiline_text(&self.shipping_address);
    }

    pub fn payment_method(&self) -> Result<PaymentMethod, UnknownStatus> {
        self.payment_method.trim().parse()
    }
}
