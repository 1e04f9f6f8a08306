//! Bazaar attribute service
//!
//! Serves category-scoped attribute definitions, listing-scoped attribute
//! values and the resolved attribute panel of a listing.
//!
//! ```text
//! bazaar-server/src/
//! ├── api/        # HTTP routes and handlers
//! ├── services/   # validation and resolution
//! ├── db/         # PostgreSQL stores
//! ├── config.rs   # environment configuration
//! ├── state.rs    # shared state
//! └── error.rs    # ServiceError
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;

pub use api::{build_app, build_router};
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use logger::init_logger;
pub use state::AppState;
