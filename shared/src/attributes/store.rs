//! Attribute store contracts
//!
//! Two independently keyed collections: definitions by category and values
//! by listing. Unknown ids are never errors on the read side; they yield an
//! empty collection.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{
    AttributeDefinition, AttributeDefinitionCreate, AttributeDefinitionUpdate, AttributeValue,
    ValueMap,
};

/// Store-layer failure
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store unreachable (network, connection refused, bad gateway)
    #[error("transport failure: {0}")]
    Transport(String),
    /// Read did not complete within the configured limit
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// Backend storage error
    #[error("database error: {0}")]
    Database(String),
    /// Request rejected by a business rule (duplicate name, unknown id, ...)
    #[error("{0}")]
    Rejected(AppError),
}

impl StoreError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<AppError> for StoreError {
    fn from(err: AppError) -> Self {
        Self::Rejected(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(app_err) => app_err,
            StoreError::Transport(msg) => AppError::with_message(ErrorCode::NetworkError, msg),
            StoreError::Timeout(limit) => AppError::with_message(
                ErrorCode::TimeoutError,
                format!("Store read timed out after {}ms", limit.as_millis()),
            ),
            StoreError::Database(msg) => {
                tracing::error!(error = %msg, "Attribute store database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Schema side: attribute definitions scoped to a category
#[async_trait]
pub trait AttributeDefinitionStore: Send + Sync {
    /// Active definitions of a category in authored order.
    async fn definitions_for_category(
        &self,
        category_id: i64,
    ) -> StoreResult<Vec<AttributeDefinition>>;

    /// Single definition by id, retired ones included.
    async fn definition(&self, id: i64) -> StoreResult<Option<AttributeDefinition>>;

    /// Create a definition. Rejects a duplicate (category, name) pair.
    async fn create_definition(
        &self,
        data: AttributeDefinitionCreate,
    ) -> StoreResult<AttributeDefinition>;

    async fn update_definition(
        &self,
        id: i64,
        data: AttributeDefinitionUpdate,
    ) -> StoreResult<AttributeDefinition>;

    /// Soft-deactivate. Stored values stay untouched.
    async fn retire_definition(&self, id: i64) -> StoreResult<AttributeDefinition>;
}

/// Value side: sparse attribute values scoped to a listing
#[async_trait]
pub trait AttributeValueStore: Send + Sync {
    /// Set values of a listing keyed by definition id. No key means unset.
    async fn values_for_listing(&self, listing_id: i64) -> StoreResult<ValueMap>;

    /// Insert or replace one value. Callers validate against the definition.
    async fn put_value(
        &self,
        listing_id: i64,
        attribute_id: i64,
        value: AttributeValue,
    ) -> StoreResult<()>;

    /// Remove one value; `false` when it was not set.
    async fn clear_value(&self, listing_id: i64, attribute_id: i64) -> StoreResult<bool>;

    /// Remove every value of a listing, returning how many were removed.
    async fn clear_listing(&self, listing_id: i64) -> StoreResult<u64>;

    /// Stored text values of one definition, counted per distinct value
    /// across all listings. Options nobody uses are absent.
    async fn option_usage(&self, attribute_id: i64) -> StoreResult<HashMap<String, u64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_to_app_error() {
        let err: AppError = StoreError::transport("connection refused").into();
        assert_eq!(err.code, ErrorCode::NetworkError);

        let err: AppError = StoreError::Timeout(Duration::from_millis(250)).into();
        assert_eq!(err.code, ErrorCode::TimeoutError);
        assert_eq!(err.message, "Store read timed out after 250ms");

        let err: AppError = StoreError::database("pool closed").into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database error");

        let err: AppError = StoreError::from(AppError::attribute_not_found(9)).into();
        assert_eq!(err.code, ErrorCode::AttributeNotFound);
    }
}
