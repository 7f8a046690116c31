// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use crate::handlers;
use axum::{
    Router,
    routing::{get, patch, post},
};
use common::HolidaySet;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jurisdiction: String,
    pub holidays: Arc<HolidaySet>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jurisdiction: impl Into<String>, holidays: HolidaySet) -> Self {
        Self {
            pool,
            jurisdiction: jurisdiction.into(),
            holidays: Arc::new(holidays),
        }
    }
}

/// Creates and configures the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Deadline records
        .route(
            "/api/deadlines",
            get(handlers::list_deadlines).post(handlers::create_deadline),
        )
        .route("/api/deadlines/grouped", get(handlers::grouped_deadlines))
        .route(
            "/api/deadlines/{id}",
            get(handlers::get_deadline).delete(handlers::delete_deadline),
        )
        .route("/api/deadlines/{id}/toggle", patch(handlers::toggle_deadline))
        .route("/api/reminders", get(handlers::reminders_today))
        // Calculators and static configuration
        .route("/api/calculate", post(handlers::calculate))
        .route("/api/rules", get(handlers::list_rules))
        .route("/api/holidays", get(handlers::list_holidays))
        .route("/api/bates", post(handlers::allocate_bates))
        // Opaque UI state blobs
        .route(
            "/api/state/{key}",
            get(handlers::get_state).put(handlers::put_state),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
