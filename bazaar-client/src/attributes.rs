//! Attribute stores over HTTP

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use shared::error::ErrorCode;
use shared::models::{
    AttributeDefinition, AttributeDefinitionCreate, AttributeDefinitionUpdate, AttributeValue,
    ValueMap,
};
use shared::{AttributeDefinitionStore, AttributeValueStore, StoreResult};

use crate::{ClientConfig, ClientError, ClientResult, HttpClient};

#[derive(Debug, Deserialize)]
struct Removed {
    removed: u64,
}

/// Remote attribute service, usable wherever a store is expected
#[derive(Debug, Clone)]
pub struct AttributeClient {
    http: HttpClient,
}

impl AttributeClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[async_trait]
impl AttributeDefinitionStore for AttributeClient {
    async fn definitions_for_category(
        &self,
        category_id: i64,
    ) -> StoreResult<Vec<AttributeDefinition>> {
        Ok(self
            .http
            .get(&format!("attributes/by-category/{category_id}"))
            .await?)
    }

    async fn definition(&self, id: i64) -> StoreResult<Option<AttributeDefinition>> {
        match self.http.get::<AttributeDefinition>(&format!("attributes/{id}")).await {
            Ok(definition) => Ok(Some(definition)),
            Err(ClientError::Api { error, .. }) if error.code == ErrorCode::AttributeNotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_definition(
        &self,
        data: AttributeDefinitionCreate,
    ) -> StoreResult<AttributeDefinition> {
        Ok(self.http.post("attributes", &data).await?)
    }

    async fn update_definition(
        &self,
        id: i64,
        data: AttributeDefinitionUpdate,
    ) -> StoreResult<AttributeDefinition> {
        Ok(self.http.put(&format!("attributes/{id}"), &data).await?)
    }

    async fn retire_definition(&self, id: i64) -> StoreResult<AttributeDefinition> {
        Ok(self
            .http
            .post_empty(&format!("attributes/{id}/retire"))
            .await?)
    }
}

#[async_trait]
impl AttributeValueStore for AttributeClient {
    async fn values_for_listing(&self, listing_id: i64) -> StoreResult<ValueMap> {
        Ok(self
            .http
            .get(&format!("attributes/values/{listing_id}"))
            .await?)
    }

    async fn put_value(
        &self,
        listing_id: i64,
        attribute_id: i64,
        value: AttributeValue,
    ) -> StoreResult<()> {
        let _: serde_json::Value = self
            .http
            .put(
                &format!("attributes/values/{listing_id}/{attribute_id}"),
                &json!({ "value": value.to_json() }),
            )
            .await?;
        Ok(())
    }

    async fn clear_value(&self, listing_id: i64, attribute_id: i64) -> StoreResult<bool> {
        let result: Removed = self
            .http
            .delete(&format!("attributes/values/{listing_id}/{attribute_id}"))
            .await?;
        Ok(result.removed > 0)
    }

    async fn clear_listing(&self, listing_id: i64) -> StoreResult<u64> {
        let result: Removed = self
            .http
            .delete(&format!("attributes/values/{listing_id}"))
            .await?;
        Ok(result.removed)
    }

    async fn option_usage(&self, attribute_id: i64) -> StoreResult<HashMap<String, u64>> {
        Ok(self
            .http
            .get(&format!("attributes/{attribute_id}/option-usage"))
            .await?)
    }
}
