use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use pantry_orders::config::ServerConfig;
use pantry_orders::db::establish_connection_pool;
use pantry_orders::repository::{DieselRepository, SettingsWriter};
use pantry_orders::routes::api::{
    api_v1_cart, api_v1_cart_add, api_v1_cart_update, api_v1_products,
};
use pantry_orders::routes::auth::{login, logout, show_login};
use pantry_orders::routes::cart::{
    add_cart_item, change_cart_item, place_order, remove_cart_item, show_cart, show_checkout,
    show_order_placed,
};
use pantry_orders::routes::categories::{
    add_category, edit_category, remove_category, show_categories,
};
use pantry_orders::routes::main::{show_catalog, show_index, show_product};
use pantry_orders::routes::orders::{
    delete_order, show_order, show_orders, update_order_status,
};
use pantry_orders::routes::products::{
    add_product, adjust_product_stock, edit_product, remove_product, show_product as show_admin_product,
    show_products,
};
use pantry_orders::routes::reports::{export_orders, show_low_stock};
use pantry_orders::routes::settings::{
    download_backup, save_settings, show_settings, upload_backup,
};
use pantry_orders::routes::shipping::{
    add_shipping_area, edit_shipping_area, remove_shipping_area, show_shipping_areas,
};
use pantry_orders::routes::stock::show_stock_history;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret_key = match env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match repo.seed_default_settings() {
        Ok(seeded) if seeded > 0 => log::info!("Seeded {seeded} default settings"),
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to seed default settings: {e}");
            std::process::exit(1);
        }
    }

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_index)
            .service(show_catalog)
            .service(show_product)
            .service(show_cart)
            .service(add_cart_item)
            .service(change_cart_item)
            .service(remove_cart_item)
            .service(show_checkout)
            .service(place_order)
            .service(show_order_placed)
            .service(api_v1_products)
            .service(api_v1_cart)
            .service(api_v1_cart_add)
            .service(api_v1_cart_update)
            .service(show_login)
            .service(login)
            .service(logout)
            .service(show_orders)
            .service(show_order)
            .service(update_order_status)
            .service(delete_order)
            .service(show_products)
            .service(show_admin_product)
            .service(add_product)
            .service(edit_product)
            .service(remove_product)
            .service(adjust_product_stock)
            .service(show_categories)
            .service(add_category)
            .service(edit_category)
            .service(remove_category)
            .service(show_shipping_areas)
            .service(add_shipping_area)
            .service(edit_shipping_area)
            .service(remove_shipping_area)
            .service(show_stock_history)
            .service(show_settings)
            .service(save_settings)
            .service(download_backup)
            .service(upload_backup)
            .service(export_orders)
            .service(show_low_stock)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
