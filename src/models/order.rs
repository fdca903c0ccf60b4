use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, NewOrderItem as DomainNewOrderItem, Order as DomainOrder,
    OrderItem as DomainOrderItem, OrderStatus, PaymentMethod, PaymentStatus, TransitionPlan,
    append_admin_note,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub shipping_area_id: Option<i32>,
    pub subtotal_cents: i64,
    pub shipping_cost_cents: i64,
    pub total_cents: i64,
    pub order_status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub admin_notes: Option<String>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub subtotal_cents: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub shipping_address: &'a str,
    pub shipping_area_id: Option<i32>,
    pub subtotal_cents: i64,
    pub shipping_cost_cents: i64,
    pub total_cents: i64,
    pub order_status: &'a str,
    pub payment_status: &'a str,
    pub payment_method: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub sku: &'a str,
    pub price_cents: i64,
    pub quantity: i32,
    pub subtotal_cents: i64,
}

/// Changeset applied when a status transition is committed. Built from the
/// stored order plus the plan so the admin-notes log can be appended, not
/// overwritten.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
pub struct OrderTransition<'a> {
    pub order_status: &'a str,
    pub payment_status: Option<&'a str>,
    pub admin_notes: Option<String>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl<'a> OrderTransition<'a> {
    pub fn from_plan(stored: &Order, plan: &'a TransitionPlan) -> Self {
        use crate::domain::order::Milestone;

        let admin_notes = plan
            .note
            .as_deref()
            .filter(|note| !note.trim().is_empty())
            .map(|note| append_admin_note(stored.admin_notes.as_deref(), note, plan.planned_at));

        Self {
            order_status: plan.target.as_str(),
            payment_status: plan.payment_status.map(PaymentStatus::as_str),
            admin_notes,
            confirmed_at: (plan.milestone == Some(Milestone::Confirmed)).then_some(plan.planned_at),
            shipped_at: (plan.milestone == Some(Milestone::Shipped)).then_some(plan.planned_at),
            delivered_at: (plan.milestone == Some(Milestone::Delivered)).then_some(plan.planned_at),
            updated_at: plan.planned_at,
        }
    }
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            order_number: self.order_number,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            shipping_address: self.shipping_address,
            shipping_area_id: self.shipping_area_id,
            subtotal_cents: self.subtotal_cents,
            shipping_cost_cents: self.shipping_cost_cents,
            total_cents: self.total_cents,
            order_status: self
                .order_status
                .parse()
                .unwrap_or(OrderStatus::Pending),
            payment_status: self
                .payment_status
                .parse()
                .unwrap_or(PaymentStatus::Pending),
            payment_method: self.payment_method.parse().unwrap_or(PaymentMethod::Cod),
            admin_notes: self.admin_notes,
            confirmed_at: self.confirmed_at,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
            items: items.into_iter().map(OrderItem::into_domain).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self) -> DomainOrderItem {
        DomainOrderItem {
            product_id: self.product_id,
            name: self.name,
            sku: self.sku,
            price_cents: self.price_cents,
            quantity: self.quantity,
            subtotal_cents: self.subtotal_cents,
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl<'a> NewOrder<'a> {
    /// Pair the checkout payload with the order number generated inside the
    /// insert transaction.
    pub fn from_domain(value: &'a DomainNewOrder, order_number: &'a str) -> Self {
        Self {
            order_number,
            customer_name: value.customer_name.as_str(),
            customer_email: value.customer_email.as_str(),
            customer_phone: value.customer_phone.as_str(),
            shipping_address: value.shipping_address.as_str(),
            shipping_area_id: value.shipping_area_id,
            subtotal_cents: value.subtotal_cents,
            shipping_cost_cents: value.shipping_cost_cents,
            total_cents: value.total_cents,
            order_status: OrderStatus::Pending.as_str(),
            payment_status: PaymentStatus::Pending.as_str(),
            payment_method: value.payment_method.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewOrderItem<'a> {
    pub fn from_domain(order_id: i32, value: &'a DomainNewOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            name: value.name.as_str(),
            sku: value.sku.as_str(),
            price_cents: value.price_cents,
            quantity: value.quantity,
            subtotal_cents: value.subtotal_cents,
        }
    }
}
