//! Attribute definition endpoints

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::AppError;
use shared::models::{AttributeDefinition, AttributeDefinitionCreate, AttributeDefinitionUpdate};

use crate::services::AttributeService;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

/// Active definitions of a category in display order; `[]` for an unknown category
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Vec<AttributeDefinition>> {
    let definitions = AttributeService::new(&state)
        .definitions_for_category(category_id)
        .await?;
    Ok(Json(definitions))
}

/// Single definition, retired ones included
pub async fn get_definition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<AttributeDefinition> {
    let definition = AttributeService::new(&state).definition(id).await?;
    Ok(Json(definition))
}

/// Stored values per select option, for admins planning an option change
pub async fn option_usage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<HashMap<String, u64>> {
    let usage = AttributeService::new(&state).option_usage(id).await?;
    Ok(Json(usage))
}

pub async fn create_definition(
    State(state): State<AppState>,
    Json(data): Json<AttributeDefinitionCreate>,
) -> Result<(StatusCode, Json<AttributeDefinition>), AppError> {
    let definition = AttributeService::new(&state).create_definition(data).await?;
    Ok((StatusCode::CREATED, Json(definition)))
}

pub async fn update_definition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<AttributeDefinitionUpdate>,
) -> ApiResult<AttributeDefinition> {
    let definition = AttributeService::new(&state)
        .update_definition(id, data)
        .await?;
    Ok(Json(definition))
}

pub async fn retire_definition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<AttributeDefinition> {
    let definition = AttributeService::new(&state).retire_definition(id).await?;
    Ok(Json(definition))
}
