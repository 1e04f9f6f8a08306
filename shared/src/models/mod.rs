//! Data models
//!
//! Shared between bazaar-server and its HTTP clients.
//! Postgres rows are mapped in `bazaar_server::db`.
//! All IDs are `i64` (snowflake, see [`crate::util::snowflake_id`]).

pub mod attribute;
pub mod category;
pub mod listing;

// Re-exports
pub use attribute::*;
pub use category::*;
pub use listing::*;
