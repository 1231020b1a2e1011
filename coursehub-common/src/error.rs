//! Shared-layer errors
//!
//! Only storage, filesystem and configuration failures originate below the
//! HTTP layer; "not found" is expressed as `Ok(None)` by the query helpers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the data folder failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable config file
    #[error("Configuration error: {0}")]
    Config(String),
}
