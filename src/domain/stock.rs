use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Direction of a ledger entry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Stock added to inventory.
    In,
    /// Stock removed from inventory.
    Out,
}

impl MovementType {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
        }
    }
}

/// What caused a ledger entry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockReference {
    /// Deduction when an order was confirmed.
    Sale,
    /// Restore when an order was cancelled.
    Return,
    /// Manual correction made by an admin.
    Adjustment,
}

impl StockReference {
    pub fn as_str(self) -> &'static str {
        match self {
            StockReference::Sale => "sale",
            StockReference::Return => "return",
            StockReference::Adjustment => "adjustment",
        }
    }
}

impl std::str::FromStr for StockReference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sale" => Ok(StockReference::Sale),
            "return" => Ok(StockReference::Return),
            "adjustment" => Ok(StockReference::Adjustment),
            other => Err(format!("unknown stock reference `{other}`")),
        }
    }
}

/// Immutable record of one change to a product's inventory count.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StockMovement {
    pub id: i32,
    pub product_id: i32,
    pub movement_type: MovementType,
    /// Signed delta applied to the stock level; negative for `out`
    /// movements. Always `current_stock - previous_stock`.
    pub quantity: i32,
    /// Stock level read at the start of the transaction.
    pub previous_stock: i32,
    /// Stock level written in the same transaction.
    pub current_stock: i32,
    pub reference: StockReference,
    /// Related record, e.g. the order id for sales and returns.
    pub reference_id: Option<i32>,
    pub notes: Option<String>,
    /// Email of the acting admin, when the change was manual.
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A requested change to a product's stock level.
///
/// Carries everything the ledger write path needs except the previous stock
/// value, which is read inside the transaction that applies the change.
#[derive(Debug, Clone)]
pub struct StockChange {
    /// Absolute number of units moved.
    pub quantity: i32,
    /// Whether the units leave or enter inventory.
    pub movement_type: MovementType,
    pub reference: StockReference,
    pub reference_id: Option<i32>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

impl StockChange {
    /// A deduction caused by a confirmed order.
    pub fn sale(quantity: i32, order_id: i32) -> Self {
        Self {
            quantity: quantity.abs(),
            movement_type: MovementType::Out,
            reference: StockReference::Sale,
            reference_id: Some(order_id),
            notes: None,
            created_by: None,
        }
    }

    /// A restore caused by a cancelled order.
    pub fn order_return(quantity: i32, order_id: i32) -> Self {
        Self {
            quantity: quantity.abs(),
            movement_type: MovementType::In,
            reference: StockReference::Return,
            reference_id: Some(order_id),
            notes: None,
            created_by: None,
        }
    }

    /// A manual admin correction; positive `delta` adds stock.
    pub fn adjustment(delta: i32) -> Self {
        Self {
            quantity: delta.abs(),
            movement_type: if delta < 0 {
                MovementType::Out
            } else {
                MovementType::In
            },
            reference: StockReference::Adjustment,
            reference_id: None,
            notes: None,
            created_by: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn by(mut self, admin_email: impl Into<String>) -> Self {
        self.created_by = Some(admin_email.into());
        self
    }

    /// New stock level after applying this change to `previous`.
    ///
    /// Deductions clamp at zero instead of failing, so a stale stock read
    /// never blocks an order confirmation. Restores are unbounded.
    pub fn apply_to(&self, previous: i32) -> i32 {
        match self.movement_type {
            MovementType::Out => (previous - self.quantity).max(0),
            MovementType::In => previous + self.quantity,
        }
    }

    /// Signed delta actually applied to `previous`; negative for `out`.
    ///
    /// Smaller in magnitude than the requested quantity when a deduction
    /// was clamped, so `previous + delta == current` holds for every
    /// ledger row.
    pub fn applied_delta(&self, previous: i32) -> i32 {
        self.apply_to(previous) - previous
    }
}

/// Query definition used to list ledger entries for the stock history view.
#[derive(Debug, Clone, Default)]
pub struct StockMovementListQuery {
    /// Optional product filter.
    pub product_id: Option<i32>,
    /// Optional reference type filter.
    pub reference: Option<StockReference>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl StockMovementListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn reference(mut self, reference: StockReference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deductions_clamp_at_zero() {
        let change = StockChange::sale(3, 7);
        assert_eq!(change.apply_to(10), 7);
        assert_eq!(change.apply_to(3), 0);
        assert_eq!(change.apply_to(2), 0);
        assert_eq!(change.apply_to(0), 0);
    }

    #[test]
    fn restores_are_unbounded() {
        let change = StockChange::order_return(5, 7);
        assert_eq!(change.apply_to(0), 5);
        assert_eq!(change.apply_to(100), 105);
    }

    #[test]
    fn applied_delta_is_signed_and_respects_the_clamp() {
        assert_eq!(StockChange::sale(4, 1).applied_delta(10), -4);
        assert_eq!(StockChange::sale(5, 1).applied_delta(2), -2);
        assert_eq!(StockChange::order_return(4, 1).applied_delta(0), 4);
        assert_eq!(StockChange::adjustment(-6).applied_delta(3), -3);
        assert_eq!(StockChange::adjustment(6).applied_delta(0), 6);
    }

    #[test]
    fn adjustment_direction_follows_the_sign() {
        assert_eq!(StockChange::adjustment(-2).movement_type, MovementType::Out);
        assert_eq!(StockChange::adjustment(2).movement_type, MovementType::In);
    }
}
