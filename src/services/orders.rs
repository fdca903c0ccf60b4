use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedAdmin, check_role};
use crate::domain::order::{Order, OrderListQuery, OrderStatus, plan_transition};
use crate::forms::orders::TransitionOrderForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the orders index page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Optional status filter, one of the six status literals.
    pub status: Option<String>,
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the orders index template.
pub struct OrdersPageData {
    /// Paginated list of orders displayed in the table.
    pub orders: Paginated<Order>,
    /// Status filter echoed back to the view when present.
    pub status: Option<OrderStatus>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
}

/// Loads the orders overview page for the back office.
pub fn load_orders_page<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    query: OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let OrdersQuery {
        status,
        search,
        page,
    } = query;

    let status = match status.as_deref().filter(|value| !value.is_empty()) {
        Some(value) => Some(
            value
                .parse::<OrderStatus>()
                .map_err(|err| ServiceError::Form(err.to_string()))?,
        ),
        None => None,
    };

    let page = page.unwrap_or(1);
    let mut list_query = OrderListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status_value) = status {
        list_query = list_query.status(status_value);
    }
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let orders = Paginated::new(orders, page, total_pages);

    Ok(OrdersPageData {
        orders,
        status,
        search,
    })
}

/// Loads one order for the detail view.
pub fn load_order<R>(repo: &R, admin: &AuthenticatedAdmin, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Moves an order along the status table.
///
/// Validates the requested edge against the order's current status, then
/// hands the computed plan (milestone stamp, payment auto-advance, note
/// append, ledger deduct/restore) to the repository, which applies it in one
/// transaction. A rejected request changes nothing.
pub fn transition_order<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    order_id: i32,
    form: TransitionOrderForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (target, note) = form
        .into_target()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let mut plan = plan_transition(&order, target)?;
    if let Some(note) = note {
        plan = plan.with_note(note);
    }
    plan = plan.with_actor(&admin.email);

    let updated = repo
        .transition_order(order_id, &plan)
        .map_err(ServiceError::from)?;

    log::info!(
        "order {} moved {} -> {} by {}",
        updated.order_number,
        order.order_status,
        updated.order_status,
        admin.email
    );

    Ok(updated)
}

/// Administrative cleanup of an order that never left `pending`.
pub fn delete_pending_order<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    order_id: i32,
) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_order(order_id).map_err(ServiceError::from)
}
