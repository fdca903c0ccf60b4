use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStatus, StockEffect,
    TransitionPlan, format_order_number,
};
use crate::domain::stock::StockChange;
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
    OrderItem as DbOrderItem, OrderTransition,
};
use crate::repository::{
    DieselRepository, OrderReader, OrderWriter, RepositoryError, RepositoryResult,
    stock::apply_stock_change,
};

fn load_items(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Vec<DbOrderItem>, diesel::result::Error> {
    use crate::schema::order_items;

    order_items::table
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = load_items(&mut conn, order.id)?;

        Ok(Some(DomainOrder::from((order, items))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let OrderListQuery {
            status,
            search,
            pagination,
        } = query;

        let status_filter = status.map(OrderStatus::as_str);
        let search_pattern = search.as_ref().map(|term| format!("%{term}%"));

        let build = || {
            let mut filtered = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status_value) = status_filter {
                filtered = filtered.filter(orders::order_status.eq(status_value));
            }
            if let Some(ref pattern) = search_pattern {
                filtered = filtered.filter(
                    orders::order_number
                        .like(pattern.clone())
                        .or(orders::customer_name.like(pattern.clone()))
                        .or(orders::customer_email.like(pattern.clone())),
                );
            }

            filtered
        };

        let total = build().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = build().order(orders::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let rows = order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
        for item in rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let order_id = order.id;
                let items = items_by_order.remove(&order_id).unwrap_or_default();
                DomainOrder::from((order, items))
            })
            .collect();

        Ok((total, orders))
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            // Per-day sequence for the human-readable number, derived from
            // the orders already numbered for today.
            let today = chrono::Local::now().date_naive();
            let day_prefix = format!("ORD-{}-%", today.format("%Y%m%d"));
            let today_count = orders::table
                .filter(orders::order_number.like(day_prefix))
                .count()
                .get_result::<i64>(conn)?;
            let order_number = format_order_number(today, today_count as u32 + 1);

            let db_new = DbNewOrder::from_domain(new_order, &order_number);

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            let order_id = created.id;

            if !new_order.items.is_empty() {
                let payload: Vec<DbNewOrderItem> = new_order
                    .items
                    .iter()
                    .map(|item| DbNewOrderItem::from_domain(order_id, item))
                    .collect();

                diesel::insert_into(order_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let items = load_items(conn, order_id)?;

            Ok(DomainOrder::from((created, items)))
        })
    }

    fn transition_order(
        &self,
        order_id: i32,
        plan: &TransitionPlan,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let stored = orders::table
                .filter(orders::id.eq(order_id))
                .first::<DbOrder>(conn)?;

            let changes = OrderTransition::from_plan(&stored, plan);

            let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set(&changes)
                .get_result::<DbOrder>(conn)?;

            let items = load_items(conn, order_id)?;

            if let Some(effect) = plan.stock_effect {
                for item in &items {
                    let Some(product_id) = item.product_id else {
                        continue;
                    };

                    let mut change = match effect {
                        StockEffect::Deduct => StockChange::sale(item.quantity, order_id),
                        StockEffect::Restore => StockChange::order_return(item.quantity, order_id),
                    };
                    if let Some(actor) = plan.actor.as_deref() {
                        change = change.by(actor);
                    }

                    apply_stock_change(conn, product_id, &change)?;
                }
            }

            Ok(DomainOrder::from((updated, items)))
        })
    }

    fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let status = orders::table
                .filter(orders::id.eq(order_id))
                .select(orders::order_status)
                .first::<String>(conn)
                .optional()?;

            let Some(status) = status else {
                return Err(RepositoryError::NotFound);
            };

            if status != OrderStatus::Pending.as_str() {
                return Err(RepositoryError::Conflict(
                    "only pending orders can be deleted".to_string(),
                ));
            }

            diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
                .execute(conn)?;
            diesel::delete(orders::table.filter(orders::id.eq(order_id))).execute(conn)?;

            Ok(())
        })
    }
}
