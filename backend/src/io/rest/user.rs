//! Caller identity.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the authenticated Telegram user id is in the `X-User-Id` header.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Response,
};
use tracing::warn;

use super::errors::error_response;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Id of the user the request acts on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(UserId)
            .ok_or_else(|| {
                warn!("Rejected request to {} without a valid user id", parts.uri.path());
                error_response(StatusCode::UNAUTHORIZED, "Missing or invalid X-User-Id header")
            })
    }
}
