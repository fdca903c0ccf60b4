use pantry_orders::domain::cart::CartItem;
use pantry_orders::domain::category::{NewCategory, UpdateCategory};
use pantry_orders::domain::order::{
    NewOrder, NewOrderItem, OrderStatus, PaymentMethod, PaymentStatus, plan_transition,
};
use pantry_orders::domain::product::{NewProduct, ProductListQuery, UpdateProduct};
use pantry_orders::domain::settings::{MIN_ORDER_KEY, SettingType, SettingUpdate};
use pantry_orders::domain::shipping_area::NewShippingArea;
use pantry_orders::domain::stock::{
    MovementType, StockChange, StockMovementListQuery, StockReference,
};
use pantry_orders::repository::{
    CartStore, CategoryReader, CategoryWriter, DieselRepository, OrderReader, OrderWriter,
    ProductReader, ProductWriter, RepositoryError, SettingsReader, SettingsWriter,
    ShippingAreaReader, ShippingAreaWriter, StockLedger,
};

mod common;

fn seed_product(repo: &DieselRepository, sku: &str, price_cents: i64, stock: i32) -> i32 {
    let new_product = NewProduct::new(sku, format!("Product {sku}"), price_cents).with_stock(stock);
    repo.create_product(&new_product).expect("create product").id
}

fn order_for(product_id: i32, sku: &str, price_cents: i64, quantity: i32) -> NewOrder {
    NewOrder::new(
        "Alice Smith",
        "alice@example.com",
        "+15550100",
        "12 Main St, Springfield",
        PaymentMethod::Cod,
        vec![NewOrderItem::new(
            product_id,
            format!("Product {sku}"),
            sku,
            price_cents,
            quantity,
        )],
    )
}

#[test]
fn test_product_repository_crud() {
    let test_db = common::TestDb::new("test_product_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_product(
            &NewProduct::new("RICE-5KG", "Basmati Rice", 1250)
                .with_stock(40)
                .with_min_stock(5)
                .with_description("Long grain."),
        )
        .unwrap();
    assert_eq!(created.stock_quantity, 40);
    assert_eq!(created.price_cents, 1250);

    // Opening stock is booked through the ledger.
    let (total, movements) = repo
        .list_movements(StockMovementListQuery::new().product(created.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(movements[0].previous_stock, 0);
    assert_eq!(movements[0].current_stock, 40);
    assert_eq!(movements[0].reference, StockReference::Adjustment);
    assert_eq!(movements[0].notes.as_deref(), Some("opening stock"));

    let by_sku = repo.get_product_by_sku("RICE-5KG").unwrap();
    assert_eq!(by_sku.map(|p| p.id), Some(created.id));

    let duplicate = repo
        .create_product(&NewProduct::new("RICE-5KG", "Duplicate", 100))
        .expect_err("duplicate sku must fail");
    assert!(matches!(duplicate, RepositoryError::Conflict(_)));

    let updated = repo
        .update_product(
            created.id,
            &UpdateProduct::new().price_cents(1300).active(false),
        )
        .unwrap();
    assert_eq!(updated.price_cents, 1300);
    assert!(!updated.is_active);
    // Product updates never touch the stock level.
    assert_eq!(updated.stock_quantity, 40);

    let (active_total, _) = repo
        .list_products(ProductListQuery::new().active_only())
        .unwrap();
    assert_eq!(active_total, 0);

    repo.delete_product(created.id).unwrap();
    assert!(repo.get_product_by_id(created.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_product(created.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_order_numbers_increment_per_day() {
    let test_db = common::TestDb::new("test_order_numbers_increment_per_day.db");
    let repo = DieselRepository::new(test_db.pool());
    let product_id = seed_product(&repo, "OIL-1L", 1000, 20);

    let first = repo
        .create_order(&order_for(product_id, "OIL-1L", 1000, 1))
        .unwrap();
    let second = repo
        .create_order(&order_for(product_id, "OIL-1L", 1000, 2))
        .unwrap();

    let today = chrono::Local::now().date_naive().format("%Y%m%d");
    assert_eq!(first.order_number, format!("ORD-{today}-0001"));
    assert_eq!(second.order_number, format!("ORD-{today}-0002"));
    assert_eq!(first.order_status, OrderStatus::Pending);
    assert_eq!(first.payment_status, PaymentStatus::Pending);
}

#[test]
fn test_confirm_deducts_stock_and_cancel_restores_it() {
    let test_db = common::TestDb::new("test_confirm_deducts_stock_and_cancel_restores_it.db");
    let repo = DieselRepository::new(test_db.pool());
    let product_id = seed_product(&repo, "FLOUR-1KG", 600, 10);

    let order = repo
        .create_order(&order_for(product_id, "FLOUR-1KG", 600, 3))
        .unwrap();
    // Checkout reserves nothing.
    assert_eq!(
        repo.get_product_by_id(product_id).unwrap().unwrap().stock_quantity,
        10
    );

    let plan = plan_transition(&order, OrderStatus::Confirmed)
        .unwrap()
        .with_actor("admin@example.com");
    let confirmed = repo.transition_order(order.id, &plan).unwrap();

    assert_eq!(confirmed.order_status, OrderStatus::Confirmed);
    assert_eq!(confirmed.payment_status, PaymentStatus::Paid);
    assert!(confirmed.confirmed_at.is_some());
    assert_eq!(
        repo.get_product_by_id(product_id).unwrap().unwrap().stock_quantity,
        7
    );

    let (_, movements) = repo
        .list_movements(
            StockMovementListQuery::new()
                .product(product_id)
                .reference(StockReference::Sale),
        )
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].quantity, -3);
    assert_eq!(movements[0].movement_type, MovementType::Out);
    assert_eq!(movements[0].reference_id, Some(order.id));
    assert_eq!(movements[0].created_by.as_deref(), Some("admin@example.com"));

    let plan = plan_transition(&confirmed, OrderStatus::Cancelled)
        .unwrap()
        .with_note("customer asked to cancel")
        .with_actor("admin@example.com");
    let cancelled = repo.transition_order(order.id, &plan).unwrap();

    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
    assert_eq!(
        repo.get_product_by_id(product_id).unwrap().unwrap().stock_quantity,
        10
    );
    let notes = cancelled.admin_notes.expect("note appended");
    assert!(notes.contains("customer asked to cancel"));

    let (_, returns) = repo
        .list_movements(
            StockMovementListQuery::new()
                .product(product_id)
                .reference(StockReference::Return),
        )
        .unwrap();
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0].quantity, 3);
}

#[test]
fn test_cancelling_a_pending_order_leaves_stock_alone() {
    let test_db = common::TestDb::new("test_cancelling_a_pending_order_leaves_stock_alone.db");
    let repo = DieselRepository::new(test_db.pool());
    let product_id = seed_product(&repo, "SUGAR-1KG", 300, 8);

    let order = repo
        .create_order(&order_for(product_id, "SUGAR-1KG", 300, 5))
        .unwrap();
    let plan = plan_transition(&order, OrderStatus::Cancelled).unwrap();
    repo.transition_order(order.id, &plan).unwrap();

    // Nothing was deducted, so nothing comes back.
    assert_eq!(
        repo.get_product_by_id(product_id).unwrap().unwrap().stock_quantity,
        8
    );
    let (total, _) = repo
        .list_movements(
            StockMovementListQuery::new()
                .product(product_id)
                .reference(StockReference::Return),
        )
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_deductions_clamp_at_zero() {
    let test_db = common::TestDb::new("test_deductions_clamp_at_zero.db");
    let repo = DieselRepository::new(test_db.pool());
    let product_id = seed_product(&repo, "BEANS-1KG", 500, 2);

    let order = repo
        .create_order(&order_for(product_id, "BEANS-1KG", 500, 5))
        .unwrap();
    let plan = plan_transition(&order, OrderStatus::Confirmed).unwrap();
    repo.transition_order(order.id, &plan).unwrap();

    let product = repo.get_product_by_id(product_id).unwrap().unwrap();
    assert_eq!(product.stock_quantity, 0);

    let (_, movements) = repo
        .list_movements(
            StockMovementListQuery::new()
                .product(product_id)
                .reference(StockReference::Sale),
        )
        .unwrap();
    assert_eq!(movements[0].previous_stock, 2);
    assert_eq!(movements[0].current_stock, 0);
    // The row records the two units that actually left, not the five asked for.
    assert_eq!(movements[0].quantity, -2);
    assert_eq!(
        movements[0].previous_stock + movements[0].quantity,
        movements[0].current_stock
    );
}

#[test]
fn test_only_pending_orders_can_be_deleted() {
    let test_db = common::TestDb::new("test_only_pending_orders_can_be_deleted.db");
    let repo = DieselRepository::new(test_db.pool());
    let product_id = seed_product(&repo, "SALT-500G", 200, 20);

    let pending = repo
        .create_order(&order_for(product_id, "SALT-500G", 200, 1))
        .unwrap();
    let confirmed = repo
        .create_order(&order_for(product_id, "SALT-500G", 200, 1))
        .unwrap();
    let plan = plan_transition(&confirmed, OrderStatus::Confirmed).unwrap();
    repo.transition_order(confirmed.id, &plan).unwrap();

    repo.delete_order(pending.id).unwrap();
    assert!(repo.get_order_by_id(pending.id).unwrap().is_none());

    let err = repo
        .delete_order(confirmed.id)
        .expect_err("confirmed orders must not be deletable");
    assert!(matches!(err, RepositoryError::Conflict(_)));
    assert!(matches!(
        repo.delete_order(9999),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_manual_adjustments_move_through_the_ledger() {
    let test_db = common::TestDb::new("test_manual_adjustments_move_through_the_ledger.db");
    let repo = DieselRepository::new(test_db.pool());
    let product_id = seed_product(&repo, "TEA-100G", 900, 5);

    let movement = repo
        .record_movement(
            product_id,
            &StockChange::adjustment(-2)
                .with_notes("damaged in transit")
                .by("admin@example.com"),
        )
        .unwrap();

    assert_eq!(movement.previous_stock, 5);
    assert_eq!(movement.current_stock, 3);
    assert_eq!(movement.quantity, -2);
    assert_eq!(
        repo.get_product_by_id(product_id).unwrap().unwrap().stock_quantity,
        3
    );

    assert!(matches!(
        repo.record_movement(9999, &StockChange::adjustment(1)),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_settings_seed_and_upsert() {
    let test_db = common::TestDb::new("test_settings_seed_and_upsert.db");
    let repo = DieselRepository::new(test_db.pool());

    let seeded = repo.seed_default_settings().unwrap();
    assert_eq!(seeded, 4);
    // Seeding again must not overwrite anything.
    assert_eq!(repo.seed_default_settings().unwrap(), 0);

    let min_order = repo.get_setting(MIN_ORDER_KEY).unwrap().unwrap();
    assert_eq!(min_order.as_cents(), Some(1500));

    repo.set_settings(&[SettingUpdate {
        key: MIN_ORDER_KEY.to_string(),
        value: "2000".to_string(),
        value_type: SettingType::Money,
    }])
    .unwrap();

    let min_order = repo.get_setting(MIN_ORDER_KEY).unwrap().unwrap();
    assert_eq!(min_order.as_cents(), Some(2000));
    assert_eq!(repo.list_settings().unwrap().len(), 4);
}

#[test]
fn test_cart_store_roundtrip() {
    let test_db = common::TestDb::new("test_cart_store_roundtrip.db");
    let repo = DieselRepository::new(test_db.pool());
    let first = seed_product(&repo, "JAM-250G", 700, 10);
    let second = seed_product(&repo, "HONEY-250G", 1100, 10);

    repo.upsert_cart_item("session-a", &CartItem::new(first, 2))
        .unwrap();
    repo.upsert_cart_item("session-a", &CartItem::new(second, 1))
        .unwrap();
    // Same product again overwrites the quantity.
    repo.upsert_cart_item("session-a", &CartItem::new(first, 4))
        .unwrap();

    let items = repo.load_cart("session-a").unwrap();
    assert_eq!(items.len(), 2);
    let first_line = items.iter().find(|item| item.product_id == first).unwrap();
    assert_eq!(first_line.quantity, 4);

    // Carts are session-scoped.
    assert!(repo.load_cart("session-b").unwrap().is_empty());

    repo.replace_cart("session-a", &[CartItem::new(second, 3)])
        .unwrap();
    let items = repo.load_cart("session-a").unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, second);

    repo.remove_cart_item("session-a", second).unwrap();
    assert!(repo.load_cart("session-a").unwrap().is_empty());

    repo.upsert_cart_item("session-a", &CartItem::new(first, 1))
        .unwrap();
    repo.clear_cart("session-a").unwrap();
    assert!(repo.load_cart("session-a").unwrap().is_empty());
}

#[test]
fn test_shipping_area_delete_is_blocked_by_orders() {
    let test_db = common::TestDb::new("test_shipping_area_delete_is_blocked_by_orders.db");
    let repo = DieselRepository::new(test_db.pool());
    let product_id = seed_product(&repo, "PASTA-500G", 400, 10);

    let used = repo
        .create_shipping_area(&NewShippingArea::new("Downtown", "10100", 450, "1-2 days"))
        .unwrap();
    let unused = repo
        .create_shipping_area(&NewShippingArea::new("Suburbs", "10200", 700, "2-3 days"))
        .unwrap();

    let new_order =
        order_for(product_id, "PASTA-500G", 400, 2).with_shipping(used.id, used.shipping_cost_cents);
    let order = repo.create_order(&new_order).unwrap();
    assert_eq!(order.shipping_cost_cents, 450);
    assert_eq!(order.total_cents, 1250);

    let err = repo
        .delete_shipping_area(used.id)
        .expect_err("referenced area must not be deletable");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    repo.delete_shipping_area(unused.id).unwrap();
    assert!(repo.get_shipping_area_by_id(unused.id).unwrap().is_none());

    let active = repo.list_shipping_areas(true).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, used.id);
}

#[test]
fn test_category_delete_detaches_products() {
    let test_db = common::TestDb::new("test_category_delete_detaches_products.db");
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&NewCategory::new("Staples")).unwrap();
    let product = repo
        .create_product(&NewProduct::new("LENTILS-1KG", "Red Lentils", 550).with_category(category.id))
        .unwrap();
    assert_eq!(product.category_id, Some(category.id));

    let renamed = repo
        .update_category(category.id, &UpdateCategory::new("Pantry Staples"))
        .unwrap();
    assert_eq!(renamed.name, "Pantry Staples");

    repo.delete_category(category.id).unwrap();
    assert!(repo.get_category_by_id(category.id).unwrap().is_none());

    let product = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(product.category_id, None);

    assert!(repo.list_categories(true).unwrap().is_empty());
}
