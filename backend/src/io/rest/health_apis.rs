use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::AppState;
use shared::HealthResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}
