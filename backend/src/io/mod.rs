//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Handlers
//! translate request DTOs from the `shared` crate into domain commands, call
//! the services held in [`crate::AppState`] and map the results (or typed
//! domain errors) back into JSON responses with the right status code.

pub mod rest;

pub use rest::*;
