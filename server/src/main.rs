// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use axum::http::HeaderName;
use common::HolidaySet;
use server::config::Config;
use server::routes::{self, AppState};
use server::{database, reminders};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting up the server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {:?}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Loaded configuration: {:?}", config);

    let holidays = match HolidaySet::for_jurisdiction(&config.jurisdiction) {
        Ok(holidays) => holidays.clone(),
        Err(e) => {
            tracing::error!(
                "{} Known jurisdictions: {}",
                e,
                HolidaySet::jurisdictions().join(", ")
            );
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Loaded {} holidays for jurisdiction '{}'.",
        holidays.len(),
        config.jurisdiction
    );

    let db_pool = match database::establish_connection_pool(&config.database_url).await {
        Ok(pool) => {
            tracing::info!("Database connection was made successfully.");
            pool
        }
        Err(e) => {
            tracing::error!("Failed to connect with the database: {:?}", e);
            std::process::exit(1);
        }
    };

    tokio::spawn(reminders::run_reminder_sweep(
        db_pool.clone(),
        config.reminder_interval,
    ));

    let state = AppState::new(db_pool, config.jurisdiction.clone(), holidays);
    let app_routes = routes::create_router(state);

    // The desktop shell serves the UI from its own origin.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
        ])
        .allow_origin(Any);

    let app = app_routes.layer(cors);

    tracing::info!("The server listens on http://{}", config.bind_addr);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {:?}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {:?}", e);
        std::process::exit(1);
    }
}
