//! # REST API for Income Categories
//!
//! Endpoints for listing, creating, updating and deleting the categories an
//! income is split across.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use tracing::{info, warn};

use crate::domain::commands::categories::{
    CreateIncomeCategoryCommand, DeleteIncomeCategoryCommand, UpdateIncomeCategoryCommand,
};
use crate::io::rest::errors::{category_error_response, error_response};
use crate::io::rest::mappers::income_category_mapper::IncomeCategoryMapper;
use crate::io::rest::user::UserId;
use crate::AppState;
use shared::{CreateIncomeCategoryRequest, UpdateIncomeCategoryRequest};

/// Create a router for income category APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", put(update_category).delete(delete_category))
}

fn invalid_body(rejection: JsonRejection) -> Response {
    warn!("Rejected income category body: {}", rejection.body_text());
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// List the caller's active categories in allocation order
pub async fn list_categories(State(state): State<AppState>, UserId(user_id): UserId) -> impl IntoResponse {
    info!("GET /api/income/categories - user {}", user_id);

    match state.income_category_service.list_categories(user_id).await {
        Ok(result) => {
            let response = IncomeCategoryMapper::to_list_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => category_error_response(&e),
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CreateIncomeCategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("POST /api/income/categories - user {} request: {:?}", user_id, request);

    let command = CreateIncomeCategoryCommand {
        user_id,
        title: request.title,
        percent: request.percent,
    };

    match state.income_category_service.create_category(command).await {
        Ok(result) => {
            let response = IncomeCategoryMapper::to_response(result);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => category_error_response(&e),
    }
}

pub async fn update_category(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(category_id): Path<i64>,
    payload: Result<Json<UpdateIncomeCategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(rejection),
    };
    info!(
        "PUT /api/income/categories/{} - user {} request: {:?}",
        category_id, user_id, request
    );

    let command = UpdateIncomeCategoryCommand {
        user_id,
        category_id,
        title: request.title,
        percent: request.percent,
        position: request.position,
    };

    match state.income_category_service.update_category(command).await {
        Ok(result) => {
            let response = IncomeCategoryMapper::to_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => category_error_response(&e),
    }
}

/// Deactivate a category; its postings stay in the ledger
pub async fn delete_category(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(category_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/income/categories/{} - user {}", category_id, user_id);

    let command = DeleteIncomeCategoryCommand { user_id, category_id };

    match state.income_category_service.delete_category(command).await {
        Ok(result) => {
            let response = IncomeCategoryMapper::to_delete_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => category_error_response(&e),
    }
}
