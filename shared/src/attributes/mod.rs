//! Listing attribute pipeline
//!
//! store -> resolver -> presenter -> layout

pub mod layout;
pub mod memory;
pub mod presenter;
pub mod resolver;
pub mod store;

pub use layout::{AttributePanel, Badge, LayoutVariant, ListingAttributes, TableRow, render};
pub use memory::MemoryStore;
pub use presenter::{DisplayStyle, DisplayValue, PresentedAttribute, format, present};
pub use resolver::{DegradeMode, DegradedSource, Resolution, Resolver, has_value, join};
pub use store::{AttributeDefinitionStore, AttributeValueStore, StoreError, StoreResult};
