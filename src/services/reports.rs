use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedAdmin, check_role};
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::domain::product::{Product, ProductListQuery};
use crate::repository::{OrderReader, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Filters applied to the orders export.
#[derive(Debug, Default, Clone)]
pub struct OrdersReportQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

fn cents_to_display(cents: i64) -> String {
    format!("{:.2}", cents as f64 / 100.0)
}

fn write_order_row<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    order: &Order,
) -> Result<(), csv::Error> {
    let item_count: i32 = order.items.iter().map(|item| item.quantity).sum();
    writer.write_record([
        order.order_number.as_str(),
        &order.created_at.format("%Y-%m-%d %H:%M").to_string(),
        order.customer_name.as_str(),
        order.customer_email.as_str(),
        order.customer_phone.as_str(),
        order.order_status.as_str(),
        order.payment_status.as_str(),
        order.payment_method.as_str(),
        &item_count.to_string(),
        &cents_to_display(order.subtotal_cents),
        &cents_to_display(order.shipping_cost_cents),
        &cents_to_display(order.total_cents),
    ])
}

/// Export matching orders as a CSV document.
///
/// The output starts with a UTF-8 BOM so spreadsheet applications pick the
/// right encoding when the file is opened directly.
pub fn orders_csv<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    query: OrdersReportQuery,
) -> ServiceResult<Vec<u8>>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let mut list_query = OrderListQuery::new();
    if let Some(status) = query.status.as_deref().filter(|value| !value.is_empty()) {
        let status = status
            .parse::<OrderStatus>()
            .map_err(|err| ServiceError::Form(err.to_string()))?;
        list_query = list_query.status(status);
    }
    if let Some(term) = query.search.filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term.trim());
    }

    let (_, orders) = repo.list_orders(list_query)?;

    let mut buffer = Vec::new();
    buffer.extend_from_slice("\u{feff}".as_bytes());
    let mut writer = csv::Writer::from_writer(buffer);
    writer
        .write_record([
            "order_number",
            "created_at",
            "customer_name",
            "customer_email",
            "customer_phone",
            "status",
            "payment_status",
            "payment_method",
            "items",
            "subtotal",
            "shipping",
            "total",
        ])
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    for order in &orders {
        write_order_row(&mut writer, order).map_err(|err| ServiceError::Form(err.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    log::info!("{} orders exported by {}", orders.len(), admin.email);
    Ok(bytes)
}

/// Products at or below their reorder threshold.
pub fn low_stock_products<R>(repo: &R, admin: &AuthenticatedAdmin) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, products) = repo.list_products(ProductListQuery::new().low_stock_only())?;
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::order::{OrderItem, PaymentMethod, PaymentStatus};
    use crate::repository::mock::MockOrderReader;

    fn admin() -> AuthenticatedAdmin {
        AuthenticatedAdmin {
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        }
    }

    fn order() -> Order {
        let now = chrono::NaiveDate::from_ymd_opt(2026, 8, 20)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .unwrap_or_default();
        Order {
            id: 1,
            order_number: "ORD-20260820-0001".to_string(),
            customer_name: "Alice Smith".to_string(),
            customer_email: "alice@example.com".to_string(),
            customer_phone: "+15550100".to_string(),
            shipping_address: "12 Main St".to_string(),
            shipping_area_id: Some(1),
            subtotal_cents: 1600,
            shipping_cost_cents: 450,
            total_cents: 2050,
            order_status: OrderStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Cod,
            admin_notes: None,
            confirmed_at: Some(now),
            shipped_at: None,
            delivered_at: None,
            items: vec![OrderItem {
                product_id: Some(1),
                name: "Rice".to_string(),
                sku: "SKU-1".to_string(),
                price_cents: 800,
                quantity: 2,
                subtotal_cents: 1600,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn export_starts_with_a_bom_and_formats_money() {
        let mut repo = MockOrderReader::new();
        repo.expect_list_orders()
            .returning(|_| Ok((1, vec![order()])));

        let bytes = orders_csv(&repo, &admin(), OrdersReportQuery::default())
            .expect("export succeeds");

        assert!(bytes.starts_with("\u{feff}".as_bytes()));
        let text = String::from_utf8(bytes).expect("valid utf-8");
        assert!(text.contains("ORD-20260820-0001"));
        assert!(text.contains("16.00"));
        assert!(text.contains("4.50"));
        assert!(text.contains("20.50"));
    }

    #[test]
    fn export_passes_the_status_filter_through() {
        let mut repo = MockOrderReader::new();
        repo.expect_list_orders()
            .withf(|query| query.status == Some(OrderStatus::Delivered))
            .times(1)
            .returning(|_| Ok((0, Vec::new())));

        let query = OrdersReportQuery {
            status: Some("delivered".to_string()),
            search: None,
        };
        orders_csv(&repo, &admin(), query).expect("export succeeds");
    }

    #[test]
    fn export_rejects_unknown_status_filters() {
        let mut repo = MockOrderReader::new();
        repo.expect_list_orders().times(0);

        let query = OrdersReportQuery {
            status: Some("teleported".to_string()),
            search: None,
        };
        let result = orders_csv(&repo, &admin(), query);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
