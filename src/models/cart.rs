use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::CartItem as DomainCartItem;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CartItem {
    pub id: i32,
    pub session_id: String,
    pub product_id: i32,
    pub quantity: i32,
    pub added_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem<'a> {
    pub session_id: &'a str,
    pub product_id: i32,
    pub quantity: i32,
    pub added_at: NaiveDateTime,
}

impl From<CartItem> for DomainCartItem {
    fn from(value: CartItem) -> Self {
        Self {
            product_id: value.product_id,
            quantity: value.quantity,
            added_at: value.added_at,
        }
    }
}

impl<'a> NewCartItem<'a> {
    pub fn from_domain(session_id: &'a str, value: &DomainCartItem) -> Self {
        Self {
            session_id,
            product_id: value.product_id,
            quantity: value.quantity,
            added_at: value.added_at,
        }
    }
}
