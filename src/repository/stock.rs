use diesel::prelude::*;

use crate::domain::stock::{
    StockChange, StockMovement as DomainStockMovement, StockMovementListQuery, StockReference,
};
use crate::models::stock::{NewStockMovement, StockMovement as DbStockMovement};
use crate::repository::{DieselRepository, RepositoryError, RepositoryResult, StockLedger};

/// Applies one stock change inside the caller's transaction: reads the
/// product's current quantity, writes the new clamped value and appends the
/// ledger row with the before/after snapshot.
///
/// Every write to `products.stock_quantity` in this crate funnels through
/// here, so the ledger can always reconstruct the stock history.
pub(crate) fn apply_stock_change(
    conn: &mut SqliteConnection,
    product_id: i32,
    change: &StockChange,
) -> Result<DbStockMovement, diesel::result::Error> {
    use crate::schema::{products, stock_movements};

    let previous_stock = products::table
        .filter(products::id.eq(product_id))
        .select(products::stock_quantity)
        .first::<i32>(conn)?;

    let current_stock = change.apply_to(previous_stock);

    diesel::update(products::table.filter(products::id.eq(product_id)))
        .set((
            products::stock_quantity.eq(current_stock),
            products::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)?;

    let row = NewStockMovement::from_change(product_id, previous_stock, change);

    diesel::insert_into(stock_movements::table)
        .values(&row)
        .get_result::<DbStockMovement>(conn)
}

impl StockLedger for DieselRepository {
    fn record_movement(
        &self,
        product_id: i32,
        change: &StockChange,
    ) -> RepositoryResult<DomainStockMovement> {
        let mut conn = self.conn()?;

        let movement = conn.transaction::<DbStockMovement, RepositoryError, _>(|conn| {
            Ok(apply_stock_change(conn, product_id, change)?)
        })?;

        Ok(movement.into())
    }

    fn list_movements(
        &self,
        query: StockMovementListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainStockMovement>)> {
        use crate::schema::stock_movements;

        let mut conn = self.conn()?;

        let StockMovementListQuery {
            product_id,
            reference,
            pagination,
        } = query;

        let reference_filter = reference.map(StockReference::as_str);

        let build = || {
            let mut filtered = stock_movements::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(product) = product_id {
                filtered = filtered.filter(stock_movements::product_id.eq(product));
            }
            if let Some(reference_value) = reference_filter {
                filtered = filtered.filter(stock_movements::reference_type.eq(reference_value));
            }
            filtered
        };

        let total = build().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = build().order(stock_movements::id.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let rows = items.load::<DbStockMovement>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}
