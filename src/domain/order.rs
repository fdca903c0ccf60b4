use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::Pagination;

/// Lifecycle states for a customer order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed at checkout, not yet reviewed.
    Pending,
    /// Order accepted by the shop; stock has been deducted.
    Confirmed,
    /// Order is being picked and packed.
    Processing,
    /// Order handed to the courier.
    Shipped,
    /// Order received by the customer. Terminal.
    Delivered,
    /// Order cancelled. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Statuses an order in this state may move to.
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Processing, Shipped, Cancelled],
            Processing => &[Shipped, Cancelled],
            Shipped => &[Delivered, Cancelled],
            Delivered | Cancelled => &[],
        }
    }

    /// Whether moving from this state to `target` is allowed.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Terminal states have no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Settlement state of the payment, tracked separately from the order status.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// How the customer chose to pay.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cod" => Ok(PaymentMethod::Cod),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Raised when a stored or submitted status literal is not recognised.
#[derive(Debug, Error)]
#[error("unknown status `{value}`")]
pub struct UnknownStatus {
    pub value: String,
}

/// Requested transition is not an edge of the status table.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot move order from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Milestone timestamp stamped by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Confirmed,
    Shipped,
    Delivered,
}

/// Inventory side effect of a transition, applied per order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    /// Deduct item quantities from inventory.
    Deduct,
    /// Return item quantities to inventory.
    Restore,
}

/// Everything a transition changes, computed up front so the repository can
/// apply it in a single transaction.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    /// Status the order moves to.
    pub target: OrderStatus,
    /// Milestone timestamp to stamp, if the target has one.
    pub milestone: Option<Milestone>,
    /// Payment status update, when the transition settles the payment.
    pub payment_status: Option<PaymentStatus>,
    /// Inventory effect applied for every order item.
    pub stock_effect: Option<StockEffect>,
    /// Optional admin note appended to the order log.
    pub note: Option<String>,
    /// Email of the admin driving the transition.
    pub actor: Option<String>,
    /// Timestamp used for the milestone, the note prefix and `updated_at`.
    pub planned_at: NaiveDateTime,
}

impl TransitionPlan {
    /// Attach an admin note to the plan.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attach the acting admin's email to the plan.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Validates `target` against the transition table and computes the side
/// effects of the move.
///
/// Payment auto-advances from pending to paid when the order enters
/// `confirmed` or `delivered`. Stock is deducted when a pending order is
/// confirmed and restored when a cancellation undoes an earlier deduction
/// (the order had reached `confirmed`, `processing` or `shipped`).
pub fn plan_transition(
    order: &Order,
    target: OrderStatus,
) -> Result<TransitionPlan, InvalidTransition> {
    let from = order.order_status;
    if !from.can_transition_to(target) {
        return Err(InvalidTransition { from, to: target });
    }

    let milestone = match target {
        OrderStatus::Confirmed => Some(Milestone::Confirmed),
        OrderStatus::Shipped => Some(Milestone::Shipped),
        OrderStatus::Delivered => Some(Milestone::Delivered),
        _ => None,
    };

    let payment_status = match target {
        OrderStatus::Confirmed | OrderStatus::Delivered
            if order.payment_status == PaymentStatus::Pending =>
        {
            Some(PaymentStatus::Paid)
        }
        _ => None,
    };

    let stock_effect = match (from, target) {
        (OrderStatus::Pending, OrderStatus::Confirmed) => Some(StockEffect::Deduct),
        (
            OrderStatus::Confirmed | OrderStatus::Processing | OrderStatus::Shipped,
            OrderStatus::Cancelled,
        ) => Some(StockEffect::Restore),
        _ => None,
    };

    Ok(TransitionPlan {
        target,
        milestone,
        payment_status,
        stock_effect,
        note: None,
        actor: None,
        planned_at: chrono::Local::now().naive_utc(),
    })
}

/// Appends `note` to the running admin log, prefixed with a timestamp.
/// Existing lines are kept untouched.
pub fn append_admin_note(existing: Option<&str>, note: &str, at: NaiveDateTime) -> String {
    let line = format!("[{}] {}", at.format("%Y-%m-%d %H:%M"), note.trim());
    match existing {
        Some(log) if !log.is_empty() => format!("{log}\n{line}"),
        _ => line,
    }
}

/// Builds the human-readable order number for the `seq`-th order of `date`.
pub fn format_order_number(date: chrono::NaiveDate, seq: u32) -> String {
    format!("ORD-{}-{:04}", date.format("%Y%m%d"), seq)
}

/// Domain representation of a customer order with its line items.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    pub id: i32,
    /// Human-readable number, date plus per-day sequence.
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub shipping_area_id: Option<i32>,
    /// Sum of item subtotals, in cents.
    pub subtotal_cents: i64,
    /// Flat fee of the shipping area at checkout time, in cents.
    pub shipping_cost_cents: i64,
    /// Always subtotal + shipping, maintained by the write path.
    pub total_cents: i64,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// Append-only, timestamp-prefixed admin log.
    pub admin_notes: Option<String>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub items: Vec<OrderItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Line item snapshot, decoupled from the live product record.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderItem {
    /// Product the snapshot was taken from, if it still exists.
    pub product_id: Option<i32>,
    pub name: String,
    pub sku: String,
    /// Effective unit price at purchase time, in cents.
    pub price_cents: i64,
    pub quantity: i32,
    /// price × quantity, in cents.
    pub subtotal_cents: i64,
}

/// Payload required to insert a new order at checkout.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub shipping_area_id: Option<i32>,
    pub payment_method: PaymentMethod,
    pub subtotal_cents: i64,
    pub shipping_cost_cents: i64,
    pub total_cents: i64,
    pub items: Vec<NewOrderItem>,
    pub updated_at: NaiveDateTime,
}

/// Line item payload captured at checkout.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<i32>,
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub subtotal_cents: i64,
}

impl NewOrderItem {
    /// Snapshot a line with `subtotal = price × quantity`.
    pub fn new(
        product_id: i32,
        name: impl Into<String>,
        sku: impl Into<String>,
        price_cents: i64,
        quantity: i32,
    ) -> Self {
        Self {
            product_id: Some(product_id),
            name: name.into(),
            sku: sku.into(),
            price_cents,
            quantity,
            subtotal_cents: price_cents * i64::from(quantity),
        }
    }
}

impl NewOrder {
    /// Build a new order payload. Subtotal and total are derived from the
    /// items and shipping fee, never supplied by the caller.
    pub fn new(
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        customer_phone: impl Into<String>,
        shipping_address: impl Into<String>,
        payment_method: PaymentMethod,
        items: Vec<NewOrderItem>,
    ) -> Self {
        let subtotal_cents = items.iter().map(|item| item.subtotal_cents).sum();
        Self {
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            customer_phone: customer_phone.into(),
            shipping_address: shipping_address.into(),
            shipping_area_id: None,
            payment_method,
            subtotal_cents,
            shipping_cost_cents: 0,
            total_cents: subtotal_cents,
            items,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Attach the shipping area and its flat fee, recomputing the total.
    pub fn with_shipping(mut self, shipping_area_id: i32, shipping_cost_cents: i64) -> Self {
        self.shipping_area_id = Some(shipping_area_id);
        self.shipping_cost_cents = shipping_cost_cents;
        self.total_cents = self.subtotal_cents + shipping_cost_cents;
        self
    }
}

/// Query definition used to list orders in the back office.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    /// Optional status filter.
    pub status: Option<OrderStatus>,
    /// Optional search term matched against order number, name and email.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self {
            status: None,
            search: None,
            pagination: None,
        }
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter the results by a search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order_with(status: OrderStatus, payment: PaymentStatus) -> Order {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Order {
            id: 1,
            order_number: "ORD-20240101-0001".to_string(),
            customer_name: "Alice".to_string(),
            customer_email: "alice@example.com".to_string(),
            customer_phone: "+100000000".to_string(),
            shipping_address: "1 Main St".to_string(),
            shipping_area_id: Some(1),
            subtotal_cents: 1000,
            shipping_cost_cents: 200,
            total_cents: 1200,
            order_status: status,
            payment_status: payment,
            payment_method: PaymentMethod::Cod,
            admin_notes: None,
            confirmed_at: None,
            shipped_at: None,
            delivered_at: None,
            items: Vec::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn transitions_follow_the_table() {
        use OrderStatus::*;

        let cases: &[(OrderStatus, &[OrderStatus])] = &[
            (Pending, &[Confirmed, Cancelled]),
            (Confirmed, &[Processing, Shipped, Cancelled]),
            (Processing, &[Shipped, Cancelled]),
            (Shipped, &[Delivered, Cancelled]),
            (Delivered, &[]),
            (Cancelled, &[]),
        ];

        let all = [Pending, Confirmed, Processing, Shipped, Delivered, Cancelled];
        for (from, allowed) in cases {
            for target in all {
                assert_eq!(
                    from.can_transition_to(target),
                    allowed.contains(&target),
                    "{from} -> {target}"
                );
            }
        }
    }

    #[test]
    fn pending_to_shipped_is_rejected() {
        let order = order_with(OrderStatus::Pending, PaymentStatus::Pending);
        let err = plan_transition(&order, OrderStatus::Shipped).unwrap_err();
        assert_eq!(err.from, OrderStatus::Pending);
        assert_eq!(err.to, OrderStatus::Shipped);
    }

    #[test]
    fn delivered_is_terminal() {
        let order = order_with(OrderStatus::Delivered, PaymentStatus::Paid);
        for target in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
        ] {
            assert!(plan_transition(&order, target).is_err());
        }
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn confirming_a_pending_order_deducts_stock_and_settles_payment() {
        let order = order_with(OrderStatus::Pending, PaymentStatus::Pending);
        let plan = plan_transition(&order, OrderStatus::Confirmed).expect("allowed");

        assert_eq!(plan.milestone, Some(Milestone::Confirmed));
        assert_eq!(plan.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(plan.stock_effect, Some(StockEffect::Deduct));
    }

    #[test]
    fn delivering_settles_a_still_pending_payment() {
        let order = order_with(OrderStatus::Shipped, PaymentStatus::Pending);
        let plan = plan_transition(&order, OrderStatus::Delivered).expect("allowed");

        assert_eq!(plan.milestone, Some(Milestone::Delivered));
        assert_eq!(plan.payment_status, Some(PaymentStatus::Paid));
        assert!(plan.stock_effect.is_none());
    }

    #[test]
    fn paid_orders_keep_their_payment_status() {
        let order = order_with(OrderStatus::Shipped, PaymentStatus::Paid);
        let plan = plan_transition(&order, OrderStatus::Delivered).expect("allowed");
        assert!(plan.payment_status.is_none());
    }

    #[test]
    fn cancelling_a_confirmed_order_restores_stock() {
        let order = order_with(OrderStatus::Confirmed, PaymentStatus::Paid);
        let plan = plan_transition(&order, OrderStatus::Cancelled).expect("allowed");

        assert!(plan.milestone.is_none());
        assert!(plan.payment_status.is_none());
        assert_eq!(plan.stock_effect, Some(StockEffect::Restore));
    }

    #[test]
    fn cancelling_a_pending_order_leaves_stock_alone() {
        // Nothing was deducted yet, so there is nothing to put back.
        let order = order_with(OrderStatus::Pending, PaymentStatus::Pending);
        let plan = plan_transition(&order, OrderStatus::Cancelled).expect("allowed");
        assert!(plan.stock_effect.is_none());
    }

    #[test]
    fn admin_notes_accumulate_with_timestamps() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|date| date.and_hms_opt(14, 30, 0))
            .unwrap_or_default();

        let first = append_admin_note(None, "called the customer", at);
        assert_eq!(first, "[2024-03-05 14:30] called the customer");

        let second = append_admin_note(Some(&first), "payment received", at);
        assert_eq!(
            second,
            "[2024-03-05 14:30] called the customer\n[2024-03-05 14:30] payment received"
        );
    }

    #[test]
    fn order_numbers_embed_date_and_sequence() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).expect("valid date");
        assert_eq!(format_order_number(date, 4), "ORD-20240709-0004");
    }

    #[test]
    fn new_order_totals_are_derived_from_items() {
        let items = vec![
            NewOrderItem::new(1, "Olive oil", "OIL-1", 1250, 2),
            NewOrderItem::new(2, "Rice 5kg", "RICE-5", 800, 1),
        ];
        let order = NewOrder::new(
            "Bob",
            "bob@example.com",
            "+2000",
            "2 Side St",
            PaymentMethod::Transfer,
            items,
        )
        .with_shipping(3, 500);

        assert_eq!(order.subtotal_cents, 3300);
        assert_eq!(order.shipping_cost_cents, 500);
        assert_eq!(order.total_cents, 3800);
        assert_eq!(order.items[0].subtotal_cents, 2500);
    }
}
