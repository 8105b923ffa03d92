//! # REST API Interface Layer
//!
//! HTTP endpoints of the income allocation service, all under `/api`:
//!
//! - `POST /income/calculate`, `POST /income/confirm`
//! - `GET /income/balances`, `GET /income/postings`
//! - `PUT /income/goals`, `POST /income/goals/reset`
//! - `GET|POST /income/categories`, `PUT|DELETE /income/categories/:id`
//! - `GET /health`
//!
//! Every income endpoint requires the `X-User-Id` header (see [`user`]).

pub mod errors;
pub mod health_apis;
pub mod income_apis;
pub mod income_category_apis;
pub mod mappers;
pub mod user;
