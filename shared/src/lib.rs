//! Shared types for the Bazaar listing attribute service
//!
//! Domain models, the unified error system, the attribute store contracts
//! and the resolve/present pipeline used by both the server and the client.

pub mod attributes;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use attributes::{
    AttributeDefinitionStore, AttributeValueStore, DegradeMode, LayoutVariant, MemoryStore,
    Resolution, Resolver, StoreError, StoreResult,
};
