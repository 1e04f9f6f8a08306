//! Bazaar Client - HTTP client for the attribute service
//!
//! [`AttributeClient`] implements both attribute store contracts over HTTP,
//! so the shared resolver runs unchanged against a remote service.
//! [`ListingAttributesView`] is the listing detail consumer built on it.

pub mod attributes;
pub mod config;
pub mod error;
pub mod http;
pub mod view;

pub use attributes::AttributeClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use view::ListingAttributesView;

// Re-export shared types for convenience
pub use shared::attributes::{AttributePanel, LayoutVariant, ListingAttributes};
pub use shared::error::{ApiResponse, AppError, ErrorCode};
