pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod settings;
pub mod shipping_area;
pub mod stock;
