//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use migration::{Migrator, MigratorTrait};
use tracing_actix_web::TracingLogger;

use quill_infra::{Argon2PasswordService, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let db = quill_infra::database::connect(&config.database)
        .await
        .map_err(std::io::Error::other)?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .map_err(std::io::Error::other)?;
        tracing::info!("Database migrations applied");
    }

    let state = AppState::new(
        db,
        Arc::new(JwtTokenService::new(config.jwt.clone())),
        Arc::new(Argon2PasswordService::new()),
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_app)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
