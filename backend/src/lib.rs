//! # Income Allocation Backend
//!
//! Splits income across a user's percentage-weighted categories and records
//! confirmed splits in a ledger.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (allocation engine, services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{AllocationCalculator, IncomeCategoryService, IncomeService};
use crate::io::rest::{health_apis, income_apis, income_category_apis};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub income_service: IncomeService<DbConnection>,
    pub income_category_service: IncomeCategoryService<DbConnection>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = Arc::new(DbConnection::new(&config.database_url, config.max_connections).await?);

    info!("Setting up domain model");
    Ok(build_app_state(db_conn, config))
}

/// Wire the services on top of an open connection
pub fn build_app_state(db_conn: Arc<DbConnection>, config: &AppConfig) -> AppState {
    let calculator = AllocationCalculator::new(config.currency.clone(), config.max_amount);
    AppState {
        income_service: IncomeService::new(db_conn.clone(), calculator),
        income_category_service: IncomeCategoryService::new(db_conn),
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match config.allowed_origin.as_deref().map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid allowed origin, allowing any: {}", e);
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    };

    let income_routes = income_apis::router().merge(income_category_apis::router());
    let api_routes = Router::new()
        .nest("/income", income_routes)
        .merge(health_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
