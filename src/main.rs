mod models;
mod routes;
mod db;
mod errors;
mod services;
mod utils;
mod middleware;
use actix_web::{App, HttpServer, web, middleware::{Logger, NormalizePath}};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    let bind_addr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    println!("🚀 Starting server on http://{}", bind_addr);

    let db_data = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .wrap(Logger::default())
            // Les URLs avec ou sans slash final sont équivalentes
            .wrap(NormalizePath::trim())
            .configure(routes::configure_routes)
    })
        .bind(bind_addr)?
        .run()
        .await
}
