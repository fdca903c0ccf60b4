use diesel::prelude::*;

use crate::domain::shipping_area::{
    NewShippingArea as DomainNewShippingArea, ShippingArea as DomainShippingArea,
    UpdateShippingArea as DomainUpdateShippingArea,
};
use crate::models::shipping_area::{
    NewShippingArea as DbNewShippingArea, ShippingArea as DbShippingArea,
    UpdateShippingArea as DbUpdateShippingArea,
};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, ShippingAreaReader, ShippingAreaWriter,
};

impl ShippingAreaReader for DieselRepository {
    fn get_shipping_area_by_id(&self, id: i32) -> RepositoryResult<Option<DomainShippingArea>> {
        use crate::schema::shipping_areas;

        let mut conn = self.conn()?;
        let area = shipping_areas::table
            .filter(shipping_areas::id.eq(id))
            .first::<DbShippingArea>(&mut conn)
            .optional()?;

        Ok(area.map(Into::into))
    }

    fn list_shipping_areas(&self, active_only: bool) -> RepositoryResult<Vec<DomainShippingArea>> {
        use crate::schema::shipping_areas;

        let mut conn = self.conn()?;

        let mut query = shipping_areas::table.into_boxed::<diesel::sqlite::Sqlite>();
        if active_only {
            query = query.filter(shipping_areas::is_active.eq(true));
        }

        let rows = query
            .order(shipping_areas::name.asc())
            .load::<DbShippingArea>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl ShippingAreaWriter for DieselRepository {
    fn create_shipping_area(
        &self,
        new_area: &DomainNewShippingArea,
    ) -> RepositoryResult<DomainShippingArea> {
        use crate::schema::shipping_areas;

        let mut conn = self.conn()?;
        let db_new = DbNewShippingArea::from(new_area);

        let created = diesel::insert_into(shipping_areas::table)
            .values(&db_new)
            .get_result::<DbShippingArea>(&mut conn)?;

        Ok(created.into())
    }

    fn update_shipping_area(
        &self,
        area_id: i32,
        updates: &DomainUpdateShippingArea,
    ) -> RepositoryResult<DomainShippingArea> {
        use crate::schema::shipping_areas;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateShippingArea::from(updates);

        let updated =
            diesel::update(shipping_areas::table.filter(shipping_areas::id.eq(area_id)))
                .set(&db_updates)
                .get_result::<DbShippingArea>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_shipping_area(&self, area_id: i32) -> RepositoryResult<()> {
        use crate::schema::{orders, shipping_areas};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let referencing = orders::table
                .filter(orders::shipping_area_id.eq(Some(area_id)))
                .count()
                .get_result::<i64>(conn)?;
            if referencing > 0 {
                return Err(RepositoryError::Conflict(format!(
                    "shipping area is referenced by {referencing} order(s)"
                )));
            }

            let deleted =
                diesel::delete(shipping_areas::table.filter(shipping_areas::id.eq(area_id)))
                    .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}
