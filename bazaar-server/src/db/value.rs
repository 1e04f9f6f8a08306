//! Attribute value queries

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{AttributeValue, StoredValue, ValueMap};
use shared::util::now_millis;
use shared::{AttributeValueStore, StoreResult};

use super::{PgStore, is_foreign_key_violation};
use crate::error::store_error;

#[async_trait]
impl AttributeValueStore for PgStore {
    async fn values_for_listing(&self, listing_id: i64) -> StoreResult<ValueMap> {
        let rows: Vec<(i64, Value)> = sqlx::query_as(
            "SELECT attribute_id, value FROM attribute_values WHERE listing_id = $1",
        )
        .bind(listing_id)
        .fetch_all(self.pool())
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|(attribute_id, value)| (attribute_id, StoredValue { value }))
            .collect())
    }

    async fn put_value(
        &self,
        listing_id: i64,
        attribute_id: i64,
        value: AttributeValue,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO attribute_values (listing_id, attribute_id, value, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (listing_id, attribute_id)
            DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(listing_id)
        .bind(attribute_id)
        .bind(value.to_json())
        .bind(now_millis())
        .execute(self.pool())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::with_message(
                    ErrorCode::ListingNotFound,
                    format!("Listing {} not found", listing_id),
                )
                .into();
            }
            store_error(e)
        })?;
        Ok(())
    }

    async fn clear_value(&self, listing_id: i64, attribute_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM attribute_values WHERE listing_id = $1 AND attribute_id = $2",
        )
        .bind(listing_id)
        .bind(attribute_id)
        .execute(self.pool())
        .await
        .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_listing(&self, listing_id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM attribute_values WHERE listing_id = $1")
            .bind(listing_id)
            .execute(self.pool())
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected())
    }

    async fn option_usage(&self, attribute_id: i64) -> StoreResult<HashMap<String, u64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT value #>> '{}', COUNT(*)
            FROM attribute_values
            WHERE attribute_id = $1 AND jsonb_typeof(value) = 'string'
            GROUP BY 1
            "#,
        )
        .bind(attribute_id)
        .fetch_all(self.pool())
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|(option, count)| (option, count as u64))
            .collect())
    }
}
