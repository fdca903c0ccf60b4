use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::stock::{
    MovementType, StockChange, StockMovement as DomainStockMovement, StockReference,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::stock_movements)]
pub struct StockMovement {
    pub id: i32,
    pub product_id: i32,
    pub movement_type: String,
    pub quantity: i32,
    pub previous_stock: i32,
    pub current_stock: i32,
    pub reference_type: String,
    pub reference_id: Option<i32>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stock_movements)]
pub struct NewStockMovement<'a> {
    pub product_id: i32,
    pub movement_type: &'a str,
    pub quantity: i32,
    pub previous_stock: i32,
    pub current_stock: i32,
    pub reference_type: &'a str,
    pub reference_id: Option<i32>,
    pub notes: Option<&'a str>,
    pub created_by: Option<&'a str>,
}

impl From<StockMovement> for DomainStockMovement {
    fn from(value: StockMovement) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            movement_type: if value.movement_type == "out" {
                MovementType::Out
            } else {
                MovementType::In
            },
            quantity: value.quantity,
            previous_stock: value.previous_stock,
            current_stock: value.current_stock,
            reference: value
                .reference_type
                .parse()
                .unwrap_or(StockReference::Adjustment),
            reference_id: value.reference_id,
            notes: value.notes,
            created_by: value.created_by,
            created_at: value.created_at,
        }
    }
}

impl<'a> NewStockMovement<'a> {
    /// Snapshot a ledger row for `change` applied to `previous_stock`.
    /// `quantity` records the delta that actually moved, so
    /// `previous_stock + quantity == current_stock` on every row, clamped
    /// deductions included.
    pub fn from_change(product_id: i32, previous_stock: i32, change: &'a StockChange) -> Self {
        Self {
            product_id,
            movement_type: change.movement_type.as_str(),
            quantity: change.applied_delta(previous_stock),
            previous_stock,
            current_stock: change.apply_to(previous_stock),
            reference_type: change.reference.as_str(),
            reference_id: change.reference_id,
            notes: change.notes.as_deref(),
            created_by: change.created_by.as_deref(),
        }
    }
}
