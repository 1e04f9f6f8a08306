//! Attribute service
//!
//! Definition management, validated value writes, and the resolved panel
//! served to the listing detail page.

use std::collections::HashMap;

use serde_json::Value;
use shared::attributes::{LayoutVariant, ListingAttributes, render};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AttributeDefinition, AttributeDefinitionCreate, AttributeDefinitionUpdate, StoredValue,
    ValueMap,
};

use crate::error::ServiceResult;
use crate::state::AppState;

pub struct AttributeService<'a> {
    state: &'a AppState,
}

impl<'a> AttributeService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    // ── Reads ──

    pub async fn definitions_for_category(
        &self,
        category_id: i64,
    ) -> ServiceResult<Vec<AttributeDefinition>> {
        Ok(self
            .state
            .definitions
            .definitions_for_category(category_id)
            .await?)
    }

    pub async fn definition(&self, id: i64) -> ServiceResult<AttributeDefinition> {
        self.require_definition(id).await
    }

    pub async fn values_for_listing(&self, listing_id: i64) -> ServiceResult<ValueMap> {
        Ok(self.state.values.values_for_listing(listing_id).await?)
    }

    /// Stored values of a definition counted per option; `{}` for an unknown id
    pub async fn option_usage(&self, attribute_id: i64) -> ServiceResult<HashMap<String, u64>> {
        Ok(self.state.values.option_usage(attribute_id).await?)
    }

    /// Resolve, format and arrange the attributes of a listing.
    ///
    /// Never fails: a store that cannot be read yields an empty panel.
    pub async fn listing_panel(
        &self,
        category_id: i64,
        listing_id: i64,
        layout: LayoutVariant,
    ) -> ListingAttributes {
        let resolution = self
            .state
            .resolver()
            .resolve_detailed(category_id, listing_id)
            .await;

        ListingAttributes {
            listing_id,
            category_id,
            panel: render(layout, &resolution.attributes),
            degraded: resolution.reported(self.state.degrade_mode),
        }
    }

    // ── Definitions ──

    pub async fn create_definition(
        &self,
        data: AttributeDefinitionCreate,
    ) -> ServiceResult<AttributeDefinition> {
        data.validate()?;
        Ok(self.state.definitions.create_definition(data).await?)
    }

    pub async fn update_definition(
        &self,
        id: i64,
        data: AttributeDefinitionUpdate,
    ) -> ServiceResult<AttributeDefinition> {
        let current = self.require_definition(id).await?;
        data.validate(&current.kind)?;
        self.ensure_options_unused(&current, data.removed_options(&current.kind))
            .await?;
        Ok(self.state.definitions.update_definition(id, data).await?)
    }

    /// Refuse to drop select options that stored values still hold.
    async fn ensure_options_unused(
        &self,
        current: &AttributeDefinition,
        removed: Vec<String>,
    ) -> ServiceResult<()> {
        if removed.is_empty() {
            return Ok(());
        }
        let usage = self.state.values.option_usage(current.id).await?;
        let in_use: Vec<String> = removed
            .into_iter()
            .filter(|o| usage.get(o).is_some_and(|n| *n > 0))
            .collect();
        if in_use.is_empty() {
            return Ok(());
        }

        tracing::warn!(attribute_id = current.id, options = ?in_use, "Refused to remove options in use");
        Err(AppError::with_message(
            ErrorCode::OptionInUse,
            format!(
                "Options of \"{}\" still used by listings: {}",
                current.name,
                in_use.join(", ")
            ),
        )
        .with_detail("attribute_id", current.id)
        .with_detail("options", in_use)
        .into())
    }

    pub async fn retire_definition(&self, id: i64) -> ServiceResult<AttributeDefinition> {
        Ok(self.state.definitions.retire_definition(id).await?)
    }

    // ── Values ──

    /// Validate `raw` against the definition and store it.
    ///
    /// An unset value (null, or "" for text types) clears the stored value and
    /// returns `None`.
    pub async fn put_value(
        &self,
        listing_id: i64,
        attribute_id: i64,
        raw: Value,
    ) -> ServiceResult<Option<StoredValue>> {
        let definition = self.require_definition(attribute_id).await?;
        if !definition.is_active {
            return Err(AppError::with_message(
                ErrorCode::AttributeRetired,
                format!("Attribute \"{}\" is retired", definition.name),
            )
            .with_detail("attribute_id", attribute_id)
            .into());
        }

        let value = definition
            .kind
            .coerce(&raw)
            .map_err(|e| e.into_app_error(&definition.name).with_detail("attribute_id", attribute_id))?;

        match value {
            Some(value) => {
                let stored = StoredValue::from(value.clone());
                self.state
                    .values
                    .put_value(listing_id, attribute_id, value)
                    .await?;
                tracing::debug!(listing_id, attribute_id, "Attribute value stored");
                Ok(Some(stored))
            }
            None => {
                self.state
                    .values
                    .clear_value(listing_id, attribute_id)
                    .await?;
                tracing::debug!(listing_id, attribute_id, "Attribute value cleared by unset write");
                Ok(None)
            }
        }
    }

    pub async fn clear_value(&self, listing_id: i64, attribute_id: i64) -> ServiceResult<bool> {
        Ok(self
            .state
            .values
            .clear_value(listing_id, attribute_id)
            .await?)
    }

    pub async fn clear_listing(&self, listing_id: i64) -> ServiceResult<u64> {
        let removed = self.state.values.clear_listing(listing_id).await?;
        tracing::info!(listing_id, removed, "Attribute values cleared for listing");
        Ok(removed)
    }

    async fn require_definition(&self, id: i64) -> ServiceResult<AttributeDefinition> {
        self.state
            .definitions
            .definition(id)
            .await?
            .ok_or_else(|| AppError::attribute_not_found(id).into())
    }
}
