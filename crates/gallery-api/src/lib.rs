//! Gallery API Library
//!
//! This crate provides the HTTP handlers, authentication extractors, middleware, and
//! application setup for the gallery service.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
