//! Unified error system for Bazaar
//!
//! - [`ErrorCode`]: Standardized error codes
//! - [`ErrorCategory`]: Classification of errors by code range
//! - [`AppError`]: Error type with code, message and details
//! - [`ApiResponse`]: Error envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (categories, attribute definitions, attribute values)
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::AttributeNotFound);
//!
//! let err = AppError::malformed_value("Mileage", "expected a number")
//!     .with_detail("attribute_id", 42);
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, Some(ErrorCode::MalformedValue.code()));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError};
