//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so non-Rust consumers can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 6xxx: Catalog ====================
    CategoryNotFound = 6101,
    ListingNotFound = 6201,
    AttributeNotFound = 6301,
    /// (category, name) pair already taken
    AttributeNameExists = 6302,
    /// Definition has been retired and accepts no new values
    AttributeRetired = 6303,
    /// Select definition declared without options
    AttributeOptionsRequired = 6304,
    /// Stored value shape disagrees with the definition type
    MalformedValue = 6311,
    /// Select value outside the allowed option set
    OptionNotAllowed = 6312,
    /// Option still referenced by stored values
    OptionInUse = 6313,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    NetworkError = 9003,
    TimeoutError = 9004,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::ListingNotFound => "Listing not found",
            ErrorCode::AttributeNotFound => "Attribute not found",
            ErrorCode::AttributeNameExists => "Attribute name already exists in this category",
            ErrorCode::AttributeRetired => "Attribute has been retired",
            ErrorCode::AttributeOptionsRequired => "Select attributes require at least one option",
            ErrorCode::MalformedValue => "Value does not match the attribute type",
            ErrorCode::OptionNotAllowed => "Value is not one of the allowed options",
            ErrorCode::OptionInUse => "Option is still used by stored values",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Catalog
            6101 => Ok(ErrorCode::CategoryNotFound),
            6201 => Ok(ErrorCode::ListingNotFound),
            6301 => Ok(ErrorCode::AttributeNotFound),
            6302 => Ok(ErrorCode::AttributeNameExists),
            6303 => Ok(ErrorCode::AttributeRetired),
            6304 => Ok(ErrorCode::AttributeOptionsRequired),
            6311 => Ok(ErrorCode::MalformedValue),
            6312 => Ok(ErrorCode::OptionNotAllowed),
            6313 => Ok(ErrorCode::OptionInUse),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AttributeNotFound.code(), 6301);
        assert_eq!(ErrorCode::MalformedValue.code(), 6311);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(4), Err(InvalidErrorCode(4)));
        assert_eq!(ErrorCode::try_from(9005), Err(InvalidErrorCode(9005)));
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::CategoryNotFound,
            ErrorCode::AttributeNameExists,
            ErrorCode::AttributeRetired,
            ErrorCode::OptionNotAllowed,
            ErrorCode::OptionInUse,
            ErrorCode::TimeoutError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::MalformedValue).unwrap();
        assert_eq!(json, "6311");

        let code: ErrorCode = serde_json::from_str("6302").unwrap();
        assert_eq!(code, ErrorCode::AttributeNameExists);

        assert!(serde_json::from_str::<ErrorCode>("12").is_err());
    }
}
