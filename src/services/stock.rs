use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedAdmin, check_role};
use crate::domain::stock::{StockChange, StockMovement, StockMovementListQuery, StockReference};
use crate::forms::stock::{AdjustStockForm, StockHistoryQueryForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::StockLedger;
use crate::services::{ServiceError, ServiceResult};

/// Book a manual stock correction through the ledger.
pub fn adjust_stock<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    product_id: i32,
    mut form: AdjustStockForm,
) -> ServiceResult<StockMovement>
where
    R: StockLedger + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    if form.delta == 0 {
        return Err(ServiceError::Form(
            "Adjustment must not be zero".to_string(),
        ));
    }

    let mut change = StockChange::adjustment(form.delta).by(&admin.email);
    if let Some(notes) = form.notes {
        change = change.with_notes(notes);
    }

    let movement = repo.record_movement(product_id, &change)?;
    log::info!(
        "stock of product {} adjusted by {} to {} by {}",
        product_id,
        form.delta,
        movement.current_stock,
        admin.email
    );
    Ok(movement)
}

/// Paginated ledger history, optionally filtered by product and cause.
pub fn stock_history<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    form: StockHistoryQueryForm,
) -> ServiceResult<Paginated<StockMovement>>
where
    R: StockLedger + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = form.page.unwrap_or(1);
    let mut query = StockMovementListQuery::new();
    if let Some(product_id) = form.product_id {
        query = query.product(product_id);
    }
    if let Some(reference) = form.reference.as_deref().filter(|value| !value.is_empty()) {
        let reference = reference
            .parse::<StockReference>()
            .map_err(ServiceError::Form)?;
        query = query.reference(reference);
    }
    query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, movements) = repo.list_movements(query)?;
    Ok(Paginated::new(
        movements,
        page,
        total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
    ))
}
