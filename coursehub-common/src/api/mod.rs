//! API module for shared HTTP API types
//!
//! Contains only framework-independent types; the service crate wraps
//! them in axum responses.

pub mod types;

pub use types::{ApiResponse, ErrorResponse};
