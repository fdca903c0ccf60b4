use serde::Deserialize;
use validator::Validate;

use crate::domain::shipping_area::{NewShippingArea, UpdateShippingArea};
use crate::forms::{parse_price_cents, sanitize_inline_text};

/// Back-office payload for creating or editing a delivery zone.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct ShippingAreaForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 16, message = "Postal code is required"))]
    pub postal_code: String,
    /// Flat fee as a decimal string, e.g. `"4.50"`.
    pub shipping_cost: String,
    #[validate(length(min = 1, max = 60, message = "A delivery estimate is required"))]
    pub estimated_delivery: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl ShippingAreaForm {
    pub fn sanitize(&mut self) {
        self.name = sanitize_inline_text(&self.name);
        self.postal_code = sanitize_inline_text(&self.postal_code);
        self.estimated_delivery = sanitize_inline_text(&self.estimated_delivery);
    }

    fn cost_cents(&self) -> Result<i64, String> {
        parse_price_cents(&self.shipping_cost).ok_or_else(|| "Invalid shipping cost".to_string())
    }

    pub fn into_new_area(self) -> Result<NewShippingArea, String> {
        let cost = self.cost_cents()?;
        Ok(NewShippingArea::new(
            self.name,
            self.postal_code,
            cost,
            self.estimated_delivery,
        ))
    }

    pub fn into_update(self) -> Result<UpdateShippingArea, String> {
        let cost = self.cost_cents()?;
        Ok(UpdateShippingArea::new()
            .name(self.name)
            .postal_code(self.postal_code)
            .shipping_cost_cents(cost)
            .estimated_delivery(self.estimated_delivery)
            .active(self.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_parses_the_fee_into_cents() {
        let form = ShippingAreaForm {
            name: "Downtown".to_string(),
            postal_code: "10100".to_string(),
            shipping_cost: "4.50".to_string(),
            estimated_delivery: "1-2 days".to_string(),
            is_active: true,
        };

        let new_area = form.into_new_area().expect("valid form");
        assert_eq!(new_area.shipping_cost_cents, 450);
    }

    #[test]
    fn bad_fees_are_rejected() {
        let form = ShippingAreaForm {
            name: "Downtown".to_string(),
            postal_code: "10100".to_string(),
            shipping_cost: "free".to_string(),
            estimated_delivery: "1-2 days".to_string(),
            is_active: true,
        };

        assert!(form.into_new_area().is_err());
    }
}
