//! # Domain Module
//!
//! Business logic for the income allocation service. Nothing in here knows
//! about HTTP; storage is reached only through the traits in
//! [`crate::storage::traits`].
//!
//! ## Module Organization
//!
//! - **category_weights**: validated, ordered snapshot of a user's categories
//! - **allocation_calculator**: pure split of an amount across a snapshot
//! - **allocation_confirmer**: re-derives an allocation and writes it to the ledger
//! - **income_service**: per-user orchestration of calculate, confirm and balances
//! - **income_category_service**: create, update and deactivate categories
//! - **commands**: command and result types passed in and out of the services
//! - **models**: domain entities and error types
//!
//! ## Core Concepts
//!
//! - **Allocation**: a split of an income amount across categories by percent
//! - **Ledger posting**: a confirmed allocation line booked against a category
//! - **Minor unit**: the smallest currency unit; all arithmetic happens in it

pub mod allocation_calculator;
pub mod allocation_confirmer;
pub mod category_weights;
pub mod commands;
pub mod income_category_service;
pub mod income_service;
pub mod models;

pub use allocation_calculator::*;
pub use allocation_confirmer::*;
pub use category_weights::*;
pub use income_category_service::*;
pub use income_service::*;
