//! # CourseHub Common Library
//!
//! Shared code for the CourseHub service crates:
//! - Catalog row models and generic catalog queries
//! - Database schema initialization
//! - API response envelope types
//! - Configuration loading

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
