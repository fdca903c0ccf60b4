use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedAdmin, check_role};
use crate::domain::shipping_area::ShippingArea;
use crate::forms::shipping::ShippingAreaForm;
use crate::repository::{ShippingAreaReader, ShippingAreaWriter};
use crate::services::{ServiceError, ServiceResult};

/// Active delivery zones for the checkout selector.
pub fn list_active_areas<R>(repo: &R) -> ServiceResult<Vec<ShippingArea>>
where
    R: ShippingAreaReader + ?Sized,
{
    Ok(repo.list_shipping_areas(true)?)
}

/// All delivery zones for the back office.
pub fn list_areas<R>(repo: &R, admin: &AuthenticatedAdmin) -> ServiceResult<Vec<ShippingArea>>
where
    R: ShippingAreaReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.list_shipping_areas(false)?)
}

pub fn create_area<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    mut form: ShippingAreaForm,
) -> ServiceResult<ShippingArea>
where
    R: ShippingAreaWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let new_area = form.into_new_area().map_err(ServiceError::Form)?;

    Ok(repo.create_shipping_area(&new_area)?)
}

pub fn update_area<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    area_id: i32,
    mut form: ShippingAreaForm,
) -> ServiceResult<ShippingArea>
where
    R: ShippingAreaWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let updates = form.into_update().map_err(ServiceError::Form)?;

    Ok(repo.update_shipping_area(area_id, &updates)?)
}

/// Delete a zone; the repository refuses while orders still reference it.
pub fn delete_area<R>(repo: &R, admin: &AuthenticatedAdmin, area_id: i32) -> ServiceResult<()>
where
    R: ShippingAreaWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_shipping_area(area_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockShippingAreaReader, MockShippingAreaWriter};

    fn admin() -> AuthenticatedAdmin {
        AuthenticatedAdmin {
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        }
    }

    fn area_form() -> ShippingAreaForm {
        ShippingAreaForm {
            name: "Downtown".to_string(),
            postal_code: "10100".to_string(),
            shipping_cost: "4.50".to_string(),
            estimated_delivery: "1-2 days".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn checkout_selector_asks_for_active_zones_only() {
        let mut repo = MockShippingAreaReader::new();
        repo.expect_list_shipping_areas()
            .withf(|active_only| *active_only)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        list_active_areas(&repo).expect("list loads");
    }

    #[test]
    fn create_parses_the_fee_into_cents() {
        let mut repo = MockShippingAreaWriter::new();
        repo.expect_create_shipping_area()
            .withf(|new_area| new_area.shipping_cost_cents == 450)
            .times(1)
            .returning(|new_area| {
                let now = chrono::Local::now().naive_utc();
                Ok(ShippingArea {
                    id: 1,
                    name: new_area.name.clone(),
                    postal_code: new_area.postal_code.clone(),
                    shipping_cost_cents: new_area.shipping_cost_cents,
                    estimated_delivery: new_area.estimated_delivery.clone(),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
            });

        create_area(&repo, &admin(), area_form()).expect("create succeeds");
    }

    #[test]
    fn delete_surfaces_reference_conflicts() {
        let mut repo = MockShippingAreaWriter::new();
        repo.expect_delete_shipping_area().returning(|_| {
            Err(RepositoryError::Conflict(
                "shipping area is referenced by orders".to_string(),
            ))
        });

        let result = delete_area(&repo, &admin(), 1);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }
}
