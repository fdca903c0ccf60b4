use thiserror::Error;

use crate::db::{DbConnection, DbPool};
use crate::domain::cart::CartItem;
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::order::{NewOrder, Order, OrderListQuery, TransitionPlan};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::settings::{AppSetting, SettingUpdate};
use crate::domain::shipping_area::{NewShippingArea, ShippingArea, UpdateShippingArea};
use crate::domain::stock::{StockChange, StockMovement, StockMovementListQuery};

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod settings;
pub mod shipping_area;
pub mod stock;

#[cfg(test)]
pub mod mock;

/// Errors surfaced by the data layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,
    /// The operation conflicts with existing data (duplicate key,
    /// referenced record, illegal delete).
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(value: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match value {
            Error::NotFound => RepositoryError::NotFound,
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::Conflict(info.message().to_string())
            }
            other => RepositoryError::Database(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over catalog products.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over catalog products. Stock is deliberately absent
/// here; it changes only through [`StockLedger`].
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over categories.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self, include_archived: bool) -> RepositoryResult<Vec<Category>>;
}

/// Write operations over categories.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        category_id: i32,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over orders.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
}

/// Write operations over orders.
pub trait OrderWriter {
    /// Insert the order and its item snapshots atomically, generating the
    /// per-day order number inside the transaction.
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    /// Apply a validated transition plan in a single transaction: status,
    /// milestone timestamp, payment update, note append and ledger entries.
    fn transition_order(&self, order_id: i32, plan: &TransitionPlan) -> RepositoryResult<Order>;
    /// Administrative cleanup; only pending orders may be deleted.
    fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
}

/// The append-only stock ledger. Every stock change goes through
/// [`StockLedger::record_movement`]; movement rows are never updated or
/// deleted.
pub trait StockLedger {
    fn record_movement(
        &self,
        product_id: i32,
        change: &StockChange,
    ) -> RepositoryResult<StockMovement>;
    fn list_movements(
        &self,
        query: StockMovementListQuery,
    ) -> RepositoryResult<(usize, Vec<StockMovement>)>;
}

/// Read-only operations over shipping areas.
pub trait ShippingAreaReader {
    fn get_shipping_area_by_id(&self, id: i32) -> RepositoryResult<Option<ShippingArea>>;
    fn list_shipping_areas(&self, active_only: bool) -> RepositoryResult<Vec<ShippingArea>>;
}

/// Write operations over shipping areas.
pub trait ShippingAreaWriter {
    fn create_shipping_area(&self, new_area: &NewShippingArea) -> RepositoryResult<ShippingArea>;
    fn update_shipping_area(
        &self,
        area_id: i32,
        updates: &UpdateShippingArea,
    ) -> RepositoryResult<ShippingArea>;
    /// Fails with `Conflict` while any order references the area.
    fn delete_shipping_area(&self, area_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over app settings.
pub trait SettingsReader {
    fn get_setting(&self, key: &str) -> RepositoryResult<Option<AppSetting>>;
    fn list_settings(&self) -> RepositoryResult<Vec<AppSetting>>;
}

/// Write operations over app settings.
pub trait SettingsWriter {
    /// Upsert all updates in one transaction.
    fn set_settings(&self, updates: &[SettingUpdate]) -> RepositoryResult<usize>;
    /// Insert the seeded defaults for keys that do not exist yet.
    fn seed_default_settings(&self) -> RepositoryResult<usize>;
}

/// Persistence for session-scoped carts, keyed by the session identifier.
pub trait CartStore {
    fn load_cart(&self, session_id: &str) -> RepositoryResult<Vec<CartItem>>;
    /// Insert the line or overwrite the quantity of an existing one.
    fn upsert_cart_item(&self, session_id: &str, item: &CartItem) -> RepositoryResult<()>;
    fn remove_cart_item(&self, session_id: &str, product_id: i32) -> RepositoryResult<()>;
    /// Replace the whole cart, used after a sync pruned stale lines.
    fn replace_cart(&self, session_id: &str, items: &[CartItem]) -> RepositoryResult<()>;
    fn clear_cart(&self, session_id: &str) -> RepositoryResult<()>;
}
