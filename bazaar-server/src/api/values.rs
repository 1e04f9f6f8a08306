//! Attribute value endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::AppError;
use shared::models::{StoredValue, ValueMap};

use crate::services::AttributeService;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

/// Body of a value write: `{"value": ...}`
#[derive(Debug, Deserialize)]
pub struct ValueWrite {
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct Removed {
    pub removed: u64,
}

/// `{ "<definitionId>": {"value": ...} }`, empty object when none
pub async fn list_values(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
) -> ApiResult<ValueMap> {
    let values = AttributeService::new(&state)
        .values_for_listing(listing_id)
        .await?;
    Ok(Json(values))
}

/// Responds with the stored value, or `{"value": null}` when the write cleared it
pub async fn put_value(
    State(state): State<AppState>,
    Path((listing_id, attribute_id)): Path<(i64, i64)>,
    Json(body): Json<ValueWrite>,
) -> ApiResult<StoredValue> {
    let stored = AttributeService::new(&state)
        .put_value(listing_id, attribute_id, body.value)
        .await?;
    Ok(Json(stored.unwrap_or(StoredValue { value: Value::Null })))
}

pub async fn clear_value(
    State(state): State<AppState>,
    Path((listing_id, attribute_id)): Path<(i64, i64)>,
) -> ApiResult<Removed> {
    let removed = AttributeService::new(&state)
        .clear_value(listing_id, attribute_id)
        .await?;
    Ok(Json(Removed {
        removed: u64::from(removed),
    }))
}

pub async fn clear_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
) -> ApiResult<Removed> {
    let removed = AttributeService::new(&state)
        .clear_listing(listing_id)
        .await?;
    Ok(Json(Removed { removed }))
}
