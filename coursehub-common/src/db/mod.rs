//! Database schema, models and catalog queries

pub mod catalog;
pub mod init;
pub mod models;
pub mod users;

pub use catalog::*;
pub use init::*;
pub use models::*;
pub use users::*;
