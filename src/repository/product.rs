use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
    UpdateProduct as DomainUpdateProduct,
};
use crate::domain::stock::StockChange;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::repository::{
    DieselRepository, ProductReader, ProductWriter, RepositoryError, RepositoryResult,
    stock::apply_stock_change,
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::sku.eq(sku))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let ProductListQuery {
            search,
            category_id,
            active_only,
            featured_only,
            low_stock_only,
            pagination,
        } = query;

        let search_pattern = search.as_ref().map(|term| format!("%{term}%"));

        let build = || {
            let mut filtered = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(ref pattern) = search_pattern {
                filtered = filtered.filter(
                    products::name
                        .like(pattern.clone())
                        .or(products::sku.like(pattern.clone())),
                );
            }
            if let Some(category) = category_id {
                filtered = filtered.filter(products::category_id.eq(Some(category)));
            }
            if active_only {
                filtered = filtered.filter(products::is_active.eq(true));
            }
            if featured_only {
                filtered = filtered.filter(products::is_featured.eq(true));
            }
            if low_stock_only {
                filtered = filtered.filter(products::stock_quantity.le(products::min_stock));
            }

            filtered
        };

        let total = build().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = build().order(products::name.asc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let rows = items.load::<DbProduct>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            // Insert with zero stock, then book the opening stock through the
            // ledger so the very first units are audited too.
            let db_new = DbNewProduct {
                stock_quantity: 0,
                ..DbNewProduct::from(new_product)
            };

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            if new_product.stock_quantity > 0 {
                let change = StockChange::adjustment(new_product.stock_quantity)
                    .with_notes("opening stock");
                apply_stock_change(conn, created.id, &change)?;
            }

            let stored = products::table
                .filter(products::id.eq(created.id))
                .first::<DbProduct>(conn)?;

            Ok(stored.into())
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(products::table.filter(products::id.eq(product_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
