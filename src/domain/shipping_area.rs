use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A delivery zone with a flat shipping fee.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShippingArea {
    /// Unique identifier of the area.
    pub id: i32,
    /// Human-readable zone name.
    pub name: String,
    /// Postal code covered by the zone.
    pub postal_code: String,
    /// Flat fee charged for delivery into the zone, in cents.
    pub shipping_cost_cents: i64,
    /// Free-text estimate shown at checkout, e.g. "1-2 days".
    pub estimated_delivery: String,
    /// Whether the zone is selectable at checkout.
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new shipping area.
#[derive(Debug, Clone)]
pub struct NewShippingArea {
    pub name: String,
    pub postal_code: String,
    pub shipping_cost_cents: i64,
    pub estimated_delivery: String,
    pub updated_at: NaiveDateTime,
}

impl NewShippingArea {
    pub fn new(
        name: impl Into<String>,
        postal_code: impl Into<String>,
        shipping_cost_cents: i64,
        estimated_delivery: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            postal_code: postal_code.into(),
            shipping_cost_cents,
            estimated_delivery: estimated_delivery.into(),
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Patch data applied when updating an existing shipping area.
#[derive(Debug, Clone)]
pub struct UpdateShippingArea {
    pub name: Option<String>,
    pub postal_code: Option<String>,
    pub shipping_cost_cents: Option<i64>,
    pub estimated_delivery: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateShippingArea {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateShippingArea {
    pub fn new() -> Self {
        Self {
            name: None,
            postal_code: None,
            shipping_cost_cents: None,
            estimated_delivery: None,
            is_active: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn shipping_cost_cents(mut self, shipping_cost_cents: i64) -> Self {
        self.shipping_cost_cents = Some(shipping_cost_cents);
        self
    }

    pub fn estimated_delivery(mut self, estimated_delivery: impl Into<String>) -> Self {
        self.estimated_delivery = Some(estimated_delivery.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}
