//! # REST API for Income Allocation
//!
//! Preview and confirm an income split, read back what has been confirmed so
//! far, and manage the savings goals shown next to the balances.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use tracing::{error, info, warn};

use crate::domain::commands::income::{
    CalculateAllocationCommand, ConfirmAllocationCommand, ListPostingsQuery, SetSavingsGoalCommand,
};
use crate::domain::models::allocation::AllocationError;
use crate::io::rest::errors::{allocation_error_response, error_response, goal_error_response};
use crate::io::rest::mappers::allocation_mapper::AllocationMapper;
use crate::io::rest::mappers::ledger_mapper::LedgerMapper;
use crate::io::rest::user::UserId;
use crate::AppState;
use shared::{
    CalculateRequest, ConfirmRequest, LedgerPostingListRequest, ResetSavingsGoalsResponse,
    SavingsGoalResponse, SetSavingsGoalRequest,
};

/// Create a router for income allocation APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate_allocation))
        .route("/confirm", post(confirm_allocation))
        .route("/balances", get(get_balances))
        .route("/postings", get(list_postings))
        .route("/goals", put(set_savings_goal))
        .route("/goals/reset", post(reset_savings_goals))
}

/// A body that is not `{ "amount": <number> }` is reported as a bad amount
fn invalid_amount_body(rejection: JsonRejection) -> Response {
    warn!("Rejected income request body: {}", rejection.body_text());
    error_response(
        StatusCode::BAD_REQUEST,
        "Invalid amount: request body must be JSON of the form {\"amount\": <number>}",
    )
}

/// Preview how an amount would be split across the caller's categories
pub async fn calculate_allocation(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_amount_body(rejection),
    };
    info!("POST /api/income/calculate - user {} amount {}", user_id, request.amount);

    let command = CalculateAllocationCommand {
        user_id,
        amount: request.amount,
    };

    match state.income_service.calculate(command).await {
        Ok(result) => {
            let response = AllocationMapper::to_calculate_response(&result, state.income_service.currency());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => allocation_error_response(&e),
    }
}

/// Split an amount across the caller's current categories and record it
pub async fn confirm_allocation(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_amount_body(rejection),
    };
    info!("POST /api/income/confirm - user {} amount {}", user_id, request.amount);

    let command = ConfirmAllocationCommand {
        user_id,
        amount: request.amount,
    };
    let currency = state.income_service.currency();

    match state.income_service.confirm(command).await {
        Ok(result) => {
            let response = AllocationMapper::to_confirm_response(result, currency);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(AllocationError::PersistenceFailure {
            applied,
            failed,
            not_attempted,
            reason,
        }) => {
            let message = format!("Failed to record income allocation: {}", reason);
            error!(
                "Confirm for user {} stopped at '{}' after {} lines",
                user_id,
                failed.code,
                applied.len()
            );
            let response =
                AllocationMapper::to_failed_confirm_response(&applied, &failed, &not_attempted, message, currency);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
        Err(e) => allocation_error_response(&e),
    }
}

/// Per-category totals of everything the caller has confirmed
pub async fn get_balances(State(state): State<AppState>, UserId(user_id): UserId) -> impl IntoResponse {
    info!("GET /api/income/balances - user {}", user_id);

    match state.income_service.list_balances(user_id).await {
        Ok(balances) => {
            let response = LedgerMapper::to_balances_response(balances, state.income_service.currency());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to load balances for user {}: {}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving balances")
        }
    }
}

/// Most recent ledger postings first
pub async fn list_postings(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<LedgerPostingListRequest>,
) -> impl IntoResponse {
    info!("GET /api/income/postings - user {} query: {:?}", user_id, query);

    let query = ListPostingsQuery {
        user_id,
        limit: query.limit,
    };

    match state.income_service.list_postings(query).await {
        Ok(postings) => {
            let response = LedgerMapper::to_postings_response(postings, state.income_service.currency());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list postings for user {}: {}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving postings")
        }
    }
}

/// Set or clear the savings goal of one of the caller's categories
pub async fn set_savings_goal(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<SetSavingsGoalRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected savings goal body: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                "Request body must be JSON with category_code and goal",
            );
        }
    };
    info!("PUT /api/income/goals - user {} request: {:?}", user_id, request);

    let command = SetSavingsGoalCommand {
        user_id,
        category_code: request.category_code,
        goal: request.goal,
        purpose: request.purpose,
    };

    match state.income_service.set_goal(command).await {
        Ok(balance) => {
            let success_message = if balance.goal.is_zero() {
                format!("Savings goal for '{}' cleared", balance.title)
            } else {
                format!("Savings goal for '{}' updated", balance.title)
            };
            let response = SavingsGoalResponse {
                balance: LedgerMapper::to_balance_dto(balance, state.income_service.currency()),
                success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => goal_error_response(&e),
    }
}

/// Clear every savings goal of the caller
pub async fn reset_savings_goals(State(state): State<AppState>, UserId(user_id): UserId) -> impl IntoResponse {
    info!("POST /api/income/goals/reset - user {}", user_id);

    match state.income_service.reset_goals(user_id).await {
        Ok(result) => {
            let response = ResetSavingsGoalsResponse {
                reset_count: result.reset_count,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => goal_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::commands::categories::CreateIncomeCategoryCommand;
    use crate::storage::DbConnection;
    use serde::de::DeserializeOwned;
    use shared::{
        CalculateResponse, CategoryBalancesResponse, ConfirmResponse, ErrorResponse, IncomeCategory,
        LedgerPostingListResponse,
    };
    use std::sync::Arc;

    async fn setup_test_app_state() -> (AppState, DbConnection) {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let state = crate::build_app_state(Arc::new(db.clone()), &AppConfig::default());
        (state, db)
    }

    async fn add_category(state: &AppState, user_id: i64, title: &str, percent: u32) {
        state
            .income_category_service
            .create_category(CreateIncomeCategoryCommand {
                user_id,
                title: title.to_string(),
                percent: Some(percent),
            })
            .await
            .expect("Failed to create category");
    }

    /// Active categories of a user, in position order
    async fn categories(state: &AppState, user_id: i64) -> Vec<IncomeCategory> {
        let response = crate::io::rest::income_category_apis::list_categories(State(state.clone()), UserId(user_id))
            .await
            .into_response();
        let body: shared::IncomeCategoryListResponse = body_json(response).await;
        body.categories
    }

    fn goal_request(code: &str, goal: f64, purpose: &str) -> SetSavingsGoalRequest {
        SetSavingsGoalRequest {
            category_code: code.to_string(),
            goal,
            purpose: purpose.to_string(),
        }
    }

    async fn body_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_api() {
        let (state, _db) = setup_test_app_state().await;
        add_category(&state, 1, "Savings", 60).await;
        add_category(&state, 1, "Spending", 40).await;

        let response = calculate_allocation(State(state), UserId(1), Ok(Json(CalculateRequest { amount: 1000.0 })))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body: CalculateResponse = body_json(response).await;
        assert_eq!(body.amount, 1000.0);
        assert_eq!(body.total_percent, 100);
        assert_eq!(body.allocations.len(), 2);
        assert_eq!(body.allocations[0].title, "Savings");
        assert_eq!(body.allocations[0].amount, 600.0);
        assert_eq!(body.allocations[1].amount, 400.0);
    }

    #[tokio::test]
    async fn test_calculate_rejects_bad_amount() {
        let (state, _db) = setup_test_app_state().await;
        add_category(&state, 1, "Savings", 100).await;

        let response = calculate_allocation(State(state), UserId(1), Ok(Json(CalculateRequest { amount: -10.0 })))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = body_json(response).await;
        assert!(body.error.starts_with("Invalid amount"));
    }

    #[tokio::test]
    async fn test_calculate_without_categories_is_empty() {
        let (state, _db) = setup_test_app_state().await;

        let response = calculate_allocation(State(state), UserId(1), Ok(Json(CalculateRequest { amount: 50.0 })))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body: CalculateResponse = body_json(response).await;
        assert!(body.allocations.is_empty());
        assert_eq!(body.total_percent, 0);
    }

    #[tokio::test]
    async fn test_confirm_api_and_balances() {
        let (state, _db) = setup_test_app_state().await;
        add_category(&state, 1, "Savings", 60).await;
        add_category(&state, 1, "Spending", 40).await;

        for _ in 0..2 {
            let response = confirm_allocation(
                State(state.clone()),
                UserId(1),
                Ok(Json(ConfirmRequest { amount: 1000.0 })),
            )
            .await
            .into_response();
            assert_eq!(response.status(), StatusCode::OK);
            let body: ConfirmResponse = body_json(response).await;
            assert!(body.ok);
            assert_eq!(body.applied.len(), 2);
            assert!(body.failed.is_none());
        }

        let response = get_balances(State(state.clone()), UserId(1)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body: CategoryBalancesResponse = body_json(response).await;
        let total: f64 = body.balances.iter().map(|b| b.amount).sum();
        assert_eq!(total, 2000.0);
        assert!(body.balances.iter().all(|b| b.postings == 2));

        let response = list_postings(
            State(state),
            UserId(1),
            Query(LedgerPostingListRequest { limit: Some(3) }),
        )
        .await
        .into_response();
        let body: LedgerPostingListResponse = body_json(response).await;
        assert_eq!(body.postings.len(), 3);
    }

    #[tokio::test]
    async fn test_confirm_without_categories_is_conflict() {
        let (state, _db) = setup_test_app_state().await;

        let response = confirm_allocation(State(state.clone()), UserId(1), Ok(Json(ConfirmRequest { amount: 10.0 })))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = get_balances(State(state), UserId(1)).await.into_response();
        let body: CategoryBalancesResponse = body_json(response).await;
        assert!(body.balances.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let (state, db) = setup_test_app_state().await;
        db.pool().close().await;

        let response = confirm_allocation(State(state), UserId(1), Ok(Json(ConfirmRequest { amount: 10.0 })))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = body_json(response).await;
        assert!(!body.error.contains("closed"));
    }

    #[tokio::test]
    async fn test_persistence_failure_reports_partial_confirm() {
        let (state, db) = setup_test_app_state().await;
        add_category(&state, 1, "Rent", 20).await;
        add_category(&state, 1, "Food", 30).await;
        add_category(&state, 1, "Savings", 50).await;
        let codes: Vec<String> = categories(&state, 1).await.into_iter().map(|c| c.code).collect();

        // Make the ledger write for the second category fail
        let trigger = format!(
            "CREATE TRIGGER fail_posting BEFORE INSERT ON income_postings \
             WHEN NEW.category_code = '{}' BEGIN SELECT RAISE(ABORT, 'ledger unavailable'); END;",
            codes[1]
        );
        sqlx::query(&trigger).execute(db.pool()).await.unwrap();

        let response = confirm_allocation(State(state.clone()), UserId(1), Ok(Json(ConfirmRequest { amount: 100.0 })))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ConfirmResponse = body_json(response).await;
        assert!(!body.ok);
        assert_eq!(body.applied.len(), 1);
        assert_eq!(body.applied[0].code, codes[0]);
        assert_eq!(body.applied[0].amount, 20.0);
        assert_eq!(body.failed.as_ref().map(|f| f.code.clone()), Some(codes[1].clone()));
        assert_eq!(body.not_attempted.len(), 1);
        assert_eq!(body.not_attempted[0].code, codes[2]);
        assert!(body
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Failed to record income allocation")));
        assert!(body.reached_goals.is_empty());

        // Only the applied line reached the ledger
        let response = get_balances(State(state), UserId(1)).await.into_response();
        let body: CategoryBalancesResponse = body_json(response).await;
        assert_eq!(body.balances.len(), 1);
        assert_eq!(body.balances[0].code, codes[0]);
    }

    #[tokio::test]
    async fn test_savings_goal_api() {
        let (state, _db) = setup_test_app_state().await;
        add_category(&state, 1, "Savings", 60).await;
        add_category(&state, 1, "Spending", 40).await;
        let codes: Vec<String> = categories(&state, 1).await.into_iter().map(|c| c.code).collect();

        let response = set_savings_goal(State(state.clone()), UserId(1), Ok(Json(goal_request(&codes[0], 1000.0, "Bike"))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body: SavingsGoalResponse = body_json(response).await;
        assert_eq!(body.balance.code, codes[0]);
        assert_eq!(body.balance.title, "Savings");
        assert_eq!(body.balance.goal, 1000.0);
        assert_eq!(body.balance.purpose, "Bike");
        assert_eq!(body.balance.progress, 0);
        assert!(!body.balance.goal_reached);

        let response = get_balances(State(state), UserId(1)).await.into_response();
        let body: CategoryBalancesResponse = body_json(response).await;
        assert_eq!(body.balances.len(), 1);
        assert_eq!(body.balances[0].amount, 0.0);
        assert_eq!(body.balances[0].goal, 1000.0);
    }

    #[tokio::test]
    async fn test_confirm_past_goal_reports_goal_reached() {
        let (state, _db) = setup_test_app_state().await;
        add_category(&state, 1, "Savings", 60).await;
        add_category(&state, 1, "Spending", 40).await;
        let codes: Vec<String> = categories(&state, 1).await.into_iter().map(|c| c.code).collect();

        set_savings_goal(State(state.clone()), UserId(1), Ok(Json(goal_request(&codes[0], 1000.0, "Bike"))))
            .await
            .into_response();

        let response = confirm_allocation(State(state.clone()), UserId(1), Ok(Json(ConfirmRequest { amount: 1000.0 })))
            .await
            .into_response();
        let body: ConfirmResponse = body_json(response).await;
        assert!(body.ok);
        assert!(body.reached_goals.is_empty());

        let response = confirm_allocation(State(state.clone()), UserId(1), Ok(Json(ConfirmRequest { amount: 1000.0 })))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body: ConfirmResponse = body_json(response).await;
        assert_eq!(body.reached_goals.len(), 1);
        assert_eq!(body.reached_goals[0].code, codes[0]);
        assert_eq!(body.reached_goals[0].amount, 1200.0);
        assert_eq!(body.reached_goals[0].progress, 100);
        assert!(body.reached_goals[0].goal_reached);

        let response = get_balances(State(state), UserId(1)).await.into_response();
        let body: CategoryBalancesResponse = body_json(response).await;
        let savings = body.balances.iter().find(|b| b.code == codes[0]).unwrap();
        assert!(savings.goal_reached);
        let spending = body.balances.iter().find(|b| b.code == codes[1]).unwrap();
        assert!(!spending.goal_reached);
        assert_eq!(spending.goal, 0.0);
    }

    #[tokio::test]
    async fn test_reset_savings_goals_api() {
        let (state, _db) = setup_test_app_state().await;
        add_category(&state, 1, "Savings", 100).await;
        let codes: Vec<String> = categories(&state, 1).await.into_iter().map(|c| c.code).collect();
        set_savings_goal(State(state.clone()), UserId(1), Ok(Json(goal_request(&codes[0], 10.0, ""))))
            .await
            .into_response();

        let response = reset_savings_goals(State(state.clone()), UserId(1)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body: ResetSavingsGoalsResponse = body_json(response).await;
        assert_eq!(body.reset_count, 1);

        let response = get_balances(State(state), UserId(1)).await.into_response();
        let body: CategoryBalancesResponse = body_json(response).await;
        assert!(body.balances.is_empty());
    }

    #[tokio::test]
    async fn test_savings_goal_rejections() {
        let (state, _db) = setup_test_app_state().await;
        add_category(&state, 1, "Savings", 100).await;
        let codes: Vec<String> = categories(&state, 1).await.into_iter().map(|c| c.code).collect();

        let response = set_savings_goal(State(state.clone()), UserId(1), Ok(Json(goal_request(&codes[0], -50.0, ""))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = body_json(response).await;
        assert!(body.error.starts_with("Invalid goal"));

        let response = set_savings_goal(State(state.clone()), UserId(2), Ok(Json(goal_request(&codes[0], 50.0, ""))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = set_savings_goal(State(state), UserId(1), Ok(Json(goal_request("missing", 50.0, ""))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
