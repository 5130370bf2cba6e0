#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate log;

mod api;
mod auth;
mod authz;
mod catalogue;
mod config;
mod db;
mod dto;
mod error;
mod models;
mod query;
mod schema;
mod seed;
mod store;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use self::config::Config;
use self::db::PgStore;
use self::store::Store;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().expect("Invalid configuration");

    // Create a connection pool to the database
    let pool = db::create_pool(&config.database_url, config.pool_size)
        .expect("Failed to create database connection pool!");
    db::run_migrations(&pool).expect("Failed to run database migrations!");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));

    if config.seed_data {
        let seed_store = store.clone();
        web::block(move || seed::seed(seed_store.as_ref()))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?
            .expect("Failed to seed initial data!");
    }

    let data: web::Data<dyn Store> = web::Data::from(store);

    info!("Listening on {}", config.listen_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(api::configure)
    })
    .bind(config.listen_addr)?
    .run()
    .await
}
