//! Attribute resolution
//!
//! Joins the definitions of a category with the values of a listing into the
//! ordered sequence of attributes that actually carry a value.
//!
//! The two reads are independent and run concurrently; the join itself is a
//! pure function over their results. A failed or timed-out read counts as
//! "no data", and because the join needs both sides, either failure empties
//! the whole result.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::{AttributeDefinitionStore, AttributeValueStore, StoreError, StoreResult};
use crate::models::{AttributeDefinition, AttributeType, ResolvedAttribute, ValueMap};

/// How a degraded read is reported to the caller.
///
/// Either way the rows come back empty; `Flagged` additionally tells the
/// caller which source failed so "broken" can be told apart from "empty".
/// There is no partial mode: a row needs both its definition and a set
/// value, so the side that did answer has nothing to show on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeMode {
    #[default]
    Silent,
    Flagged,
}

impl DegradeMode {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "silent" => Some(Self::Silent),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }
}

/// Which side of the join could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedSource {
    Definitions,
    Values,
}

/// Outcome of one resolve call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub attributes: Vec<ResolvedAttribute>,
    pub degraded: Vec<DegradedSource>,
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Degraded sources as the caller should see them under `mode`
    pub fn reported(&self, mode: DegradeMode) -> Vec<DegradedSource> {
        match mode {
            DegradeMode::Silent => Vec::new(),
            DegradeMode::Flagged => self.degraded.clone(),
        }
    }
}

/// Fork-join resolver over a definition store and a value store
pub struct Resolver<'a> {
    definitions: &'a dyn AttributeDefinitionStore,
    values: &'a dyn AttributeValueStore,
    read_timeout: Option<Duration>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        definitions: &'a dyn AttributeDefinitionStore,
        values: &'a dyn AttributeValueStore,
    ) -> Self {
        Self {
            definitions,
            values,
            read_timeout: None,
        }
    }

    /// Bound each store read; a read that overruns counts as empty.
    pub fn with_read_timeout(mut self, limit: Duration) -> Self {
        self.read_timeout = Some(limit);
        self
    }

    /// Resolved attributes of a listing, in definition order.
    pub async fn resolve(&self, category_id: i64, listing_id: i64) -> Vec<ResolvedAttribute> {
        self.resolve_detailed(category_id, listing_id)
            .await
            .attributes
    }

    /// Like [`Resolver::resolve`], also reporting which reads degraded.
    pub async fn resolve_detailed(&self, category_id: i64, listing_id: i64) -> Resolution {
        let (definitions, values) = tokio::join!(
            self.bounded(self.definitions.definitions_for_category(category_id)),
            self.bounded(self.values.values_for_listing(listing_id)),
        );

        let mut degraded = Vec::new();
        let definitions = definitions.unwrap_or_else(|e| {
            tracing::warn!(category_id, error = %e, "Attribute definitions unavailable");
            degraded.push(DegradedSource::Definitions);
            Vec::new()
        });
        let values = values.unwrap_or_else(|e| {
            tracing::warn!(listing_id, error = %e, "Attribute values unavailable");
            degraded.push(DegradedSource::Values);
            ValueMap::new()
        });

        let attributes = if degraded.is_empty() {
            join(&definitions, &values)
        } else {
            Vec::new()
        };

        tracing::debug!(
            category_id,
            listing_id,
            definitions = definitions.len(),
            values = values.len(),
            resolved = attributes.len(),
            "Resolved listing attributes"
        );

        Resolution {
            attributes,
            degraded,
        }
    }

    async fn bounded<T>(&self, read: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => read.await,
        }
    }
}

/// Whether a raw stored value counts as set for an attribute of `kind`.
///
/// Absent, null and (for text types) empty string are unset; `0` and
/// `false` are values.
pub fn has_value(kind: &AttributeType, raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) if kind.is_textual() => !s.is_empty(),
        Some(_) => true,
    }
}

/// Pure join of definitions with values.
///
/// Output is the subsequence of `definitions` whose value is set, in the same
/// order. A value that does not fit its definition drops only that row.
pub fn join(definitions: &[AttributeDefinition], values: &ValueMap) -> Vec<ResolvedAttribute> {
    definitions
        .iter()
        .filter_map(|definition| {
            let raw = values.get(&definition.id).map(|stored| &stored.value);
            if !has_value(&definition.kind, raw) {
                return None;
            }

            match definition.kind.coerce(raw?) {
                Ok(Some(value)) => Some(ResolvedAttribute {
                    definition: definition.clone(),
                    value: Some(value),
                    has_value: true,
                }),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(
                        attribute_id = definition.id,
                        attribute = %definition.name,
                        error = %e,
                        "Dropping malformed attribute value"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::MemoryStore;
    use crate::models::{
        AttributeDefinitionCreate, AttributeDefinitionUpdate, AttributeValue, StoredValue,
    };
    use async_trait::async_trait;
    use serde_json::json;

    fn def(id: i64, name: &str, kind: AttributeType) -> AttributeDefinition {
        AttributeDefinition {
            id,
            category_id: 1,
            name: name.to_string(),
            kind,
            description: None,
            display_order: 0,
            is_active: true,
        }
    }

    fn values(entries: &[(i64, Value)]) -> ValueMap {
        entries
            .iter()
            .map(|(id, v)| (*id, StoredValue::new(v.clone())))
            .collect()
    }

    fn ids(resolved: &[ResolvedAttribute]) -> Vec<i64> {
        resolved.iter().map(|r| r.definition.id).collect()
    }

    /// Store wrapper that can fail or stall either read
    #[derive(Clone, Default)]
    struct Flaky {
        inner: MemoryStore,
        fail: bool,
        stall: Option<Duration>,
    }

    impl Flaky {
        async fn gate(&self) -> StoreResult<()> {
            if let Some(delay) = self.stall {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(StoreError::transport("connection refused"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AttributeDefinitionStore for Flaky {
        async fn definitions_for_category(
            &self,
            category_id: i64,
        ) -> StoreResult<Vec<AttributeDefinition>> {
            self.gate().await?;
            self.inner.definitions_for_category(category_id).await
        }

        async fn definition(&self, id: i64) -> StoreResult<Option<AttributeDefinition>> {
            self.inner.definition(id).await
        }

        async fn create_definition(
            &self,
            data: AttributeDefinitionCreate,
        ) -> StoreResult<AttributeDefinition> {
            self.inner.create_definition(data).await
        }

        async fn update_definition(
            &self,
            id: i64,
            data: AttributeDefinitionUpdate,
        ) -> StoreResult<AttributeDefinition> {
            self.inner.update_definition(id, data).await
        }

        async fn retire_definition(&self, id: i64) -> StoreResult<AttributeDefinition> {
            self.inner.retire_definition(id).await
        }
    }

    #[async_trait]
    impl AttributeValueStore for Flaky {
        async fn values_for_listing(&self, listing_id: i64) -> StoreResult<ValueMap> {
            self.gate().await?;
            self.inner.values_for_listing(listing_id).await
        }

        async fn put_value(
            &self,
            listing_id: i64,
            attribute_id: i64,
            value: AttributeValue,
        ) -> StoreResult<()> {
            self.inner.put_value(listing_id, attribute_id, value).await
        }

        async fn clear_value(&self, listing_id: i64, attribute_id: i64) -> StoreResult<bool> {
            self.inner.clear_value(listing_id, attribute_id).await
        }

        async fn clear_listing(&self, listing_id: i64) -> StoreResult<u64> {
            self.inner.clear_listing(listing_id).await
        }

        async fn option_usage(
            &self,
            attribute_id: i64,
        ) -> StoreResult<std::collections::HashMap<String, u64>> {
            self.inner.option_usage(attribute_id).await
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_definition(def(1, "Warranty", AttributeType::Boolean));
        store.insert_definition(def(2, "Mileage", AttributeType::Number));
        store.insert_raw_value(100, 1, StoredValue::new(true));
        store.insert_raw_value(100, 2, StoredValue::new(12000));
        store
    }

    #[test]
    fn test_has_value_classification() {
        let text = AttributeType::String;
        assert!(!has_value(&text, None));
        assert!(!has_value(&text, Some(&Value::Null)));
        assert!(!has_value(&text, Some(&json!(""))));
        assert!(has_value(&text, Some(&json!("blue"))));
        assert!(has_value(&AttributeType::Boolean, Some(&json!(false))));
        assert!(has_value(&AttributeType::Number, Some(&json!(0))));
    }

    #[test]
    fn test_join_warranty_set_mileage_unset() {
        let definitions = vec![
            def(1, "Warranty", AttributeType::Boolean),
            def(2, "Mileage", AttributeType::Number),
        ];
        let resolved = join(&definitions, &values(&[(1, json!(true))]));

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].definition.id, 1);
        assert_eq!(resolved[0].value, Some(AttributeValue::Boolean(true)));
        assert!(resolved[0].has_value);
    }

    #[test]
    fn test_join_zero_is_a_value() {
        let definitions = vec![def(1, "Mileage", AttributeType::Number)];
        let resolved = join(&definitions, &values(&[(1, json!(0))]));

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].value, Some(AttributeValue::Number(0.0)));
        assert!(resolved[0].has_value);
    }

    #[test]
    fn test_join_without_definitions_is_empty() {
        let resolved = join(&[], &values(&[(1, json!("x")), (2, json!(5))]));
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_join_preserves_definition_order() {
        let definitions: Vec<AttributeDefinition> = (1..=20)
            .rev()
            .map(|id| def(id, &format!("attr{id}"), AttributeType::Number))
            .collect();
        let entries: Vec<(i64, Value)> = (1..=20)
            .filter(|id| id % 3 != 0)
            .map(|id| (id, json!(id)))
            .collect();

        let resolved = join(&definitions, &values(&entries));
        let expected: Vec<i64> = (1..=20).rev().filter(|id| id % 3 != 0).collect();
        assert_eq!(ids(&resolved), expected);
    }

    #[test]
    fn test_join_drops_unset_and_malformed_rows_only() {
        let definitions = vec![
            def(1, "Colour", AttributeType::String),
            def(2, "Notes", AttributeType::String),
            def(3, "Mileage", AttributeType::Number),
            def(
                4,
                "Condition",
                AttributeType::Select {
                    options: vec!["new".to_string(), "used".to_string()],
                },
            ),
            def(5, "Warranty", AttributeType::Boolean),
            def(6, "Doors", AttributeType::Number),
        ];
        let resolved = join(
            &definitions,
            &values(&[
                (1, json!("red")),
                (2, json!("")),
                (3, json!("a lot")),
                (4, json!("refurbished")),
                (5, Value::Null),
                (6, json!(4)),
                (99, json!("orphan")),
            ]),
        );
        assert_eq!(ids(&resolved), vec![1, 6]);
    }

    #[tokio::test]
    async fn test_resolve_from_stores() {
        let store = seeded();
        let resolver = Resolver::new(&store, &store);
        let resolved = resolver.resolve(1, 100).await;
        assert_eq!(ids(&resolved), vec![1, 2]);
        assert_eq!(resolved[1].value, Some(AttributeValue::Number(12000.0)));
    }

    #[tokio::test]
    async fn test_definition_store_failure_degrades_to_empty() {
        let definitions = Flaky {
            inner: seeded(),
            fail: true,
            stall: None,
        };
        let values = seeded();

        let resolution = Resolver::new(&definitions, &values)
            .resolve_detailed(1, 100)
            .await;
        assert!(resolution.attributes.is_empty());
        assert_eq!(resolution.degraded, vec![DegradedSource::Definitions]);
        assert!(resolution.reported(DegradeMode::Silent).is_empty());
        assert_eq!(
            resolution.reported(DegradeMode::Flagged),
            vec![DegradedSource::Definitions]
        );
    }

    #[tokio::test]
    async fn test_value_store_failure_degrades_to_empty() {
        let definitions = seeded();
        let values = Flaky {
            inner: seeded(),
            fail: true,
            stall: None,
        };

        let resolution = Resolver::new(&definitions, &values)
            .resolve_detailed(1, 100)
            .await;
        assert!(resolution.attributes.is_empty());
        assert_eq!(resolution.degraded, vec![DegradedSource::Values]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_empty() {
        let definitions = Flaky {
            inner: seeded(),
            fail: false,
            stall: Some(Duration::from_secs(30)),
        };
        let values = seeded();

        let resolution = Resolver::new(&definitions, &values)
            .with_read_timeout(Duration::from_millis(500))
            .resolve_detailed(1, 100)
            .await;
        assert!(resolution.attributes.is_empty());
        assert_eq!(resolution.degraded, vec![DegradedSource::Definitions]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_run_concurrently() {
        let definitions = Flaky {
            inner: seeded(),
            fail: false,
            stall: Some(Duration::from_millis(400)),
        };
        let values = Flaky {
            inner: seeded(),
            fail: false,
            stall: Some(Duration::from_millis(400)),
        };

        let started = tokio::time::Instant::now();
        let resolution = Resolver::new(&definitions, &values)
            .resolve_detailed(1, 100)
            .await;

        // Sequential reads would take 800ms
        assert!(started.elapsed() < Duration::from_millis(800));
        assert!(!resolution.is_degraded());
        assert_eq!(ids(&resolution.attributes), vec![1, 2]);
    }

    #[test]
    fn test_degrade_mode_parse() {
        assert_eq!(DegradeMode::parse("Flagged"), Some(DegradeMode::Flagged));
        assert_eq!(DegradeMode::parse(" silent "), Some(DegradeMode::Silent));
        assert_eq!(DegradeMode::parse("loud"), None);
    }
}
