use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::shipping_area::{
    NewShippingArea as DomainNewShippingArea, ShippingArea as DomainShippingArea,
    UpdateShippingArea as DomainUpdateShippingArea,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shipping_areas)]
pub struct ShippingArea {
    pub id: i32,
    pub name: String,
    pub postal_code: String,
    pub shipping_cost_cents: i64,
    pub estimated_delivery: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shipping_areas)]
pub struct NewShippingArea<'a> {
    pub name: &'a str,
    pub postal_code: &'a str,
    pub shipping_cost_cents: i64,
    pub estimated_delivery: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::shipping_areas)]
pub struct UpdateShippingArea<'a> {
    pub name: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub shipping_cost_cents: Option<i64>,
    pub estimated_delivery: Option<&'a str>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<ShippingArea> for DomainShippingArea {
    fn from(value: ShippingArea) -> Self {
        Self {
            id: value.id,
            name: value.name,
            postal_code: value.postal_code,
            shipping_cost_cents: value.shipping_cost_cents,
            estimated_delivery: value.estimated_delivery,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewShippingArea> for NewShippingArea<'a> {
    fn from(value: &'a DomainNewShippingArea) -> Self {
        Self {
            name: value.name.as_str(),
            postal_code: value.postal_code.as_str(),
            shipping_cost_cents: value.shipping_cost_cents,
            estimated_delivery: value.estimated_delivery.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateShippingArea> for UpdateShippingArea<'a> {
    fn from(value: &'a DomainUpdateShippingArea) -> Self {
        Self {
            name: value.name.as_deref(),
            postal_code: value.postal_code.as_deref(),
            shipping_cost_cents: value.shipping_cost_cents,
            estimated_delivery: value.estimated_delivery.as_deref(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
