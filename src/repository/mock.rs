use mockall::mock;

use super::{
    CartStore, CategoryReader, CategoryWriter, OrderReader, OrderWriter, ProductReader,
    ProductWriter, RepositoryResult, SettingsReader, SettingsWriter, ShippingAreaReader,
    ShippingAreaWriter, StockLedger,
};
use crate::domain::{
    cart::CartItem,
    category::{Category, NewCategory, UpdateCategory},
    order::{NewOrder, Order, OrderListQuery, TransitionPlan},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    settings::{AppSetting, SettingUpdate},
    shipping_area::{NewShippingArea, ShippingArea, UpdateShippingArea},
    stock::{StockChange, StockMovement, StockMovementListQuery},
};

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self, include_archived: bool) -> RepositoryResult<Vec<Category>>;
    }
}

mock! {
    pub CategoryWriter {}

    impl CategoryWriter for CategoryWriter {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn update_category(&self, category_id: i32, updates: &UpdateCategory) -> RepositoryResult<Category>;
        fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn transition_order(&self, order_id: i32, plan: &TransitionPlan) -> RepositoryResult<Order>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub StockLedger {}

    impl StockLedger for StockLedger {
        fn record_movement(&self, product_id: i32, change: &StockChange) -> RepositoryResult<StockMovement>;
        fn list_movements(&self, query: StockMovementListQuery) -> RepositoryResult<(usize, Vec<StockMovement>)>;
    }
}

mock! {
    pub ShippingAreaReader {}

    impl ShippingAreaReader for ShippingAreaReader {
        fn get_shipping_area_by_id(&self, id: i32) -> RepositoryResult<Option<ShippingArea>>;
        fn list_shipping_areas(&self, active_only: bool) -> RepositoryResult<Vec<ShippingArea>>;
    }
}

mock! {
    pub ShippingAreaWriter {}

    impl ShippingAreaWriter for ShippingAreaWriter {
        fn create_shipping_area(&self, new_area: &NewShippingArea) -> RepositoryResult<ShippingArea>;
        fn update_shipping_area(&self, area_id: i32, updates: &UpdateShippingArea) -> RepositoryResult<ShippingArea>;
        fn delete_shipping_area(&self, area_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub SettingsReader {}

    impl SettingsReader for SettingsReader {
        fn get_setting(&self, key: &str) -> RepositoryResult<Option<AppSetting>>;
        fn list_settings(&self) -> RepositoryResult<Vec<AppSetting>>;
    }
}

mock! {
    pub SettingsWriter {}

    impl SettingsWriter for SettingsWriter {
        fn set_settings(&self, updates: &[SettingUpdate]) -> RepositoryResult<usize>;
        fn seed_default_settings(&self) -> RepositoryResult<usize>;
    }
}

mock! {
    pub CartStore {}

    impl CartStore for CartStore {
        fn load_cart(&self, session_id: &str) -> RepositoryResult<Vec<CartItem>>;
        fn upsert_cart_item(&self, session_id: &str, item: &CartItem) -> RepositoryResult<()>;
        fn remove_cart_item(&self, session_id: &str, product_id: i32) -> RepositoryResult<()>;
        fn replace_cart(&self, session_id: &str, items: &[CartItem]) -> RepositoryResult<()>;
        fn clear_cart(&self, session_id: &str) -> RepositoryResult<()>;
    }
}
