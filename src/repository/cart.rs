use diesel::prelude::*;

use crate::domain::cart::CartItem as DomainCartItem;
use crate::models::cart::{CartItem as DbCartItem, NewCartItem};
use crate::repository::{CartStore, DieselRepository, RepositoryError, RepositoryResult};

impl CartStore for DieselRepository {
    fn load_cart(&self, session_id: &str) -> RepositoryResult<Vec<DomainCartItem>> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let rows = cart_items::table
            .filter(cart_items::session_id.eq(session_id))
            .order(cart_items::added_at.asc())
            .load::<DbCartItem>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn upsert_cart_item(&self, session_id: &str, item: &DomainCartItem) -> RepositoryResult<()> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let row = NewCartItem::from_domain(session_id, item);

        diesel::insert_into(cart_items::table)
            .values(&row)
            .on_conflict((cart_items::session_id, cart_items::product_id))
            .do_update()
            .set(cart_items::quantity.eq(item.quantity))
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove_cart_item(&self, session_id: &str, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        diesel::delete(
            cart_items::table
                .filter(cart_items::session_id.eq(session_id))
                .filter(cart_items::product_id.eq(product_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }

    fn replace_cart(&self, session_id: &str, items: &[DomainCartItem]) -> RepositoryResult<()> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(cart_items::table.filter(cart_items::session_id.eq(session_id)))
                .execute(conn)?;

            if !items.is_empty() {
                let rows: Vec<NewCartItem> = items
                    .iter()
                    .map(|item| NewCartItem::from_domain(session_id, item))
                    .collect();
                diesel::insert_into(cart_items::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(())
        })
    }

    fn clear_cart(&self, session_id: &str) -> RepositoryResult<()> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        diesel::delete(cart_items::table.filter(cart_items::session_id.eq(session_id)))
            .execute(&mut conn)?;

        Ok(())
    }
}
