use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod models;
mod notes;

use config::Config;
use db::Database;
use notes::NoteService;

pub struct AppState {
    pub db: Arc<Database>,
    pub notes: NoteService,
    /// Server start time for uptime reporting
    pub started_at: std::time::Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let db = match Database::open(&config.database_url) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!(
                "[DB] Failed to open database at {}: {}",
                config.database_url,
                e
            );
            std::process::exit(1);
        }
    };

    let started_at = std::time::Instant::now();
    let port = config.port;

    log::info!("Starting notes-backend server on port {}", port);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                notes: NoteService::new(Arc::clone(&db)),
                started_at,
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::simulation::config)
    })
    .bind(("0.0.0.0", port))?
    .run();

    let server_handle = server.handle();

    // Ctrl+C handler for graceful shutdown
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        log::info!("Received Ctrl+C, shutting down...");
        server_handle.stop(true).await;
        log::info!("Shutdown complete");
    });

    server.await
}
