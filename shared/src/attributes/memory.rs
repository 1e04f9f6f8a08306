//! In-memory attribute store
//!
//! Backs development mode and tests. Definitions keep insertion order, so
//! authored order falls out of a stable sort on `display_order`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::store::{AttributeDefinitionStore, AttributeValueStore, StoreResult};
use crate::error::{AppError, ErrorCode};
use crate::models::{
    AttributeDefinition, AttributeDefinitionCreate, AttributeDefinitionUpdate, AttributeValue,
    StoredValue, ValueMap,
};
use crate::util::snowflake_id;

#[derive(Debug, Default)]
struct Inner {
    definitions: Vec<AttributeDefinition>,
    /// listing_id -> attribute_id -> value
    values: HashMap<i64, ValueMap>,
}

/// Both attribute stores over process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed definition as-is (seeding, tests).
    pub fn insert_definition(&self, definition: AttributeDefinition) {
        let mut inner = self.inner.write();
        inner.definitions.retain(|d| d.id != definition.id);
        inner.definitions.push(definition);
    }

    /// Store a raw value without any type check.
    ///
    /// Mirrors rows written before write-time validation existed.
    pub fn insert_raw_value(&self, listing_id: i64, attribute_id: i64, value: StoredValue) {
        self.inner
            .write()
            .values
            .entry(listing_id)
            .or_default()
            .insert(attribute_id, value);
    }

    fn find(inner: &Inner, id: i64) -> Result<usize, AppError> {
        inner
            .definitions
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::attribute_not_found(id))
    }

    fn name_taken(inner: &Inner, category_id: i64, name: &str, except: Option<i64>) -> bool {
        inner
            .definitions
            .iter()
            .any(|d| d.category_id == category_id && d.name == name && Some(d.id) != except)
    }
}

fn name_exists(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::AttributeNameExists,
        format!("Attribute \"{}\" already exists in this category", name),
    )
    .with_detail("name", name)
}

#[async_trait]
impl AttributeDefinitionStore for MemoryStore {
    async fn definitions_for_category(
        &self,
        category_id: i64,
    ) -> StoreResult<Vec<AttributeDefinition>> {
        let inner = self.inner.read();
        let mut definitions: Vec<AttributeDefinition> = inner
            .definitions
            .iter()
            .filter(|d| d.category_id == category_id && d.is_active)
            .cloned()
            .collect();
        definitions.sort_by_key(|d| d.display_order);
        Ok(definitions)
    }

    async fn definition(&self, id: i64) -> StoreResult<Option<AttributeDefinition>> {
        let inner = self.inner.read();
        Ok(inner.definitions.iter().find(|d| d.id == id).cloned())
    }

    async fn create_definition(
        &self,
        data: AttributeDefinitionCreate,
    ) -> StoreResult<AttributeDefinition> {
        let mut inner = self.inner.write();
        let name = data.name.trim().to_string();
        if Self::name_taken(&inner, data.category_id, &name, None) {
            return Err(name_exists(&name).into());
        }

        let display_order = data.display_order.unwrap_or_else(|| {
            inner
                .definitions
                .iter()
                .filter(|d| d.category_id == data.category_id)
                .map(|d| d.display_order + 1)
                .max()
                .unwrap_or(0)
        });

        let definition = AttributeDefinition {
            id: snowflake_id(),
            category_id: data.category_id,
            name,
            kind: data.kind,
            description: data.description.filter(|d| !d.is_empty()),
            display_order,
            is_active: true,
        };
        inner.definitions.push(definition.clone());
        Ok(definition)
    }

    async fn update_definition(
        &self,
        id: i64,
        data: AttributeDefinitionUpdate,
    ) -> StoreResult<AttributeDefinition> {
        let mut inner = self.inner.write();
        let idx = Self::find(&inner, id)?;

        let mut updated = inner.definitions[idx].clone();
        updated.apply(data);
        if Self::name_taken(&inner, updated.category_id, &updated.name, Some(id)) {
            return Err(name_exists(&updated.name).into());
        }

        inner.definitions[idx] = updated.clone();
        Ok(updated)
    }

    async fn retire_definition(&self, id: i64) -> StoreResult<AttributeDefinition> {
        let mut inner = self.inner.write();
        let idx = Self::find(&inner, id)?;
        inner.definitions[idx].is_active = false;
        Ok(inner.definitions[idx].clone())
    }
}

#[async_trait]
impl AttributeValueStore for MemoryStore {
    async fn values_for_listing(&self, listing_id: i64) -> StoreResult<ValueMap> {
        let inner = self.inner.read();
        Ok(inner.values.get(&listing_id).cloned().unwrap_or_default())
    }

    async fn put_value(
        &self,
        listing_id: i64,
        attribute_id: i64,
        value: AttributeValue,
    ) -> StoreResult<()> {
        self.insert_raw_value(listing_id, attribute_id, value.into());
        Ok(())
    }

    async fn clear_value(&self, listing_id: i64, attribute_id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        let Some(values) = inner.values.get_mut(&listing_id) else {
            return Ok(false);
        };
        let removed = values.remove(&attribute_id).is_some();
        if values.is_empty() {
            inner.values.remove(&listing_id);
        }
        Ok(removed)
    }

    async fn clear_listing(&self, listing_id: i64) -> StoreResult<u64> {
        let removed = self.inner.write().values.remove(&listing_id);
        Ok(removed.map_or(0, |values| values.len() as u64))
    }

    async fn option_usage(&self, attribute_id: i64) -> StoreResult<HashMap<String, u64>> {
        let inner = self.inner.read();
        let mut usage = HashMap::new();
        for stored in inner.values.values().filter_map(|v| v.get(&attribute_id)) {
            if let Some(text) = stored.value.as_str() {
                *usage.entry(text.to_string()).or_insert(0) += 1;
            }
        }
        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeType;
    use crate::StoreError;

    fn create(category_id: i64, name: &str, kind: AttributeType) -> AttributeDefinitionCreate {
        AttributeDefinitionCreate {
            category_id,
            name: name.to_string(),
            kind,
            description: None,
            display_order: None,
        }
    }

    #[tokio::test]
    async fn test_definitions_keep_authored_order() {
        let store = MemoryStore::new();
        for name in ["Year", "Mileage", "Colour", "Airbags"] {
            store
                .create_definition(create(1, name, AttributeType::String))
                .await
                .unwrap();
        }
        store
            .create_definition(create(2, "Storage", AttributeType::Number))
            .await
            .unwrap();

        let names: Vec<String> = store
            .definitions_for_category(1)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["Year", "Mileage", "Colour", "Airbags"]);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_empty() {
        let store = MemoryStore::new();
        assert!(store.definitions_for_category(404).await.unwrap().is_empty());
        assert!(store.values_for_listing(404).await.unwrap().is_empty());
        assert!(store.definition(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let store = MemoryStore::new();
        store
            .create_definition(create(1, "Mileage", AttributeType::Number))
            .await
            .unwrap();
        let err = store
            .create_definition(create(1, "Mileage ", AttributeType::String))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Rejected(AppError { code: ErrorCode::AttributeNameExists, .. })
        ));

        // Same name in another category is fine
        store
            .create_definition(create(2, "Mileage", AttributeType::Number))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_retired_definitions_hidden_but_fetchable() {
        let store = MemoryStore::new();
        let def = store
            .create_definition(create(1, "Warranty", AttributeType::Boolean))
            .await
            .unwrap();
        store.retire_definition(def.id).await.unwrap();

        assert!(store.definitions_for_category(1).await.unwrap().is_empty());
        let fetched = store.definition(def.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn test_value_lifecycle() {
        let store = MemoryStore::new();
        store
            .put_value(7, 1, AttributeValue::Boolean(false))
            .await
            .unwrap();
        store
            .put_value(7, 2, AttributeValue::Number(0.0))
            .await
            .unwrap();

        let values = store.values_for_listing(7).await.unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[&1], StoredValue::new(false));
        assert_eq!(values[&2], StoredValue::new(0));

        assert!(store.clear_value(7, 1).await.unwrap());
        assert!(!store.clear_value(7, 1).await.unwrap());
        assert_eq!(store.clear_listing(7).await.unwrap(), 1);
        assert!(store.values_for_listing(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_option_usage_counts_listings_per_option() {
        let store = MemoryStore::new();
        for (listing, option) in [(1, "used"), (2, "used"), (3, "new")] {
            store
                .put_value(listing, 5, AttributeValue::Select(option.to_string()))
                .await
                .unwrap();
        }
        store
            .put_value(1, 6, AttributeValue::Select("used".to_string()))
            .await
            .unwrap();
        store.insert_raw_value(4, 5, StoredValue::new(3));

        let usage = store.option_usage(5).await.unwrap();
        assert_eq!(usage.len(), 2);
        assert_eq!(usage["used"], 2);
        assert_eq!(usage["new"], 1);

        store.clear_value(3, 5).await.unwrap();
        assert!(!store.option_usage(5).await.unwrap().contains_key("new"));
        assert!(store.option_usage(404).await.unwrap().is_empty());
    }
}
