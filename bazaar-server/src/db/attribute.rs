//! Attribute definition queries

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AttributeDefinition, AttributeDefinitionCreate, AttributeDefinitionUpdate, AttributeType,
};
use shared::util::{now_millis, snowflake_id};
use shared::{AttributeDefinitionStore, StoreError, StoreResult};
use sqlx::types::Json;

use super::{PgStore, is_foreign_key_violation};
use crate::error::{store_error, write_error};

const COLUMNS: &str = "id, category_id, name, attr_type, options, description, display_order, is_active";

#[derive(sqlx::FromRow)]
struct DefinitionRow {
    id: i64,
    category_id: i64,
    name: String,
    attr_type: String,
    options: Option<Json<Vec<String>>>,
    description: Option<String>,
    display_order: i32,
    is_active: bool,
}

impl TryFrom<DefinitionRow> for AttributeDefinition {
    type Error = StoreError;

    fn try_from(row: DefinitionRow) -> Result<Self, Self::Error> {
        let kind = match row.attr_type.as_str() {
            "string" => AttributeType::String,
            "number" => AttributeType::Number,
            "boolean" => AttributeType::Boolean,
            "select" => AttributeType::Select {
                options: row.options.map(|o| o.0).unwrap_or_default(),
            },
            other => {
                return Err(StoreError::database(format!(
                    "attribute {} has unknown type {other:?}",
                    row.id
                )));
            }
        };
        Ok(AttributeDefinition {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            kind,
            description: row.description,
            display_order: row.display_order,
            is_active: row.is_active,
        })
    }
}

fn options_json(kind: &AttributeType) -> Option<Json<Vec<String>>> {
    match kind {
        AttributeType::Select { options } => Some(Json(options.clone())),
        _ => None,
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
impl AttributeDefinitionStore for PgStore {
    async fn definitions_for_category(
        &self,
        category_id: i64,
    ) -> StoreResult<Vec<AttributeDefinition>> {
        let rows: Vec<DefinitionRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM attribute_definitions \
             WHERE category_id = $1 AND is_active = TRUE \
             ORDER BY display_order, id"
        ))
        .bind(category_id)
        .fetch_all(self.pool())
        .await
        .map_err(store_error)?;

        rows.into_iter().map(AttributeDefinition::try_from).collect()
    }

    async fn definition(&self, id: i64) -> StoreResult<Option<AttributeDefinition>> {
        let row: Option<DefinitionRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM attribute_definitions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(store_error)?;

        row.map(AttributeDefinition::try_from).transpose()
    }

    async fn create_definition(
        &self,
        data: AttributeDefinitionCreate,
    ) -> StoreResult<AttributeDefinition> {
        let name = data.name.trim().to_string();
        let now = now_millis();

        let row: DefinitionRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO attribute_definitions (
                id, category_id, name, attr_type, options, description,
                display_order, is_active, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6,
                COALESCE($7, (SELECT COALESCE(MAX(display_order) + 1, 0)
                              FROM attribute_definitions WHERE category_id = $2)),
                TRUE, $8, $8
            )
            RETURNING {COLUMNS}
            "#
        ))
        .bind(snowflake_id())
        .bind(data.category_id)
        .bind(&name)
        .bind(data.kind.name())
        .bind(options_json(&data.kind))
        .bind(data.description.filter(|d| !d.is_empty()))
        .bind(data.display_order)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::with_message(
                    ErrorCode::CategoryNotFound,
                    format!("Category {} not found", data.category_id),
                )
                .into();
            }
            write_error(e, || name_exists(&name))
        })?;

        tracing::info!(attribute_id = row.id, category_id = row.category_id, name = %row.name, "Attribute definition created");
        row.try_into()
    }

    async fn update_definition(
        &self,
        id: i64,
        data: AttributeDefinitionUpdate,
    ) -> StoreResult<AttributeDefinition> {
        let mut tx = self.pool().begin().await.map_err(store_error)?;

        let current: Option<DefinitionRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM attribute_definitions WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?;
        let mut definition = match current {
            Some(row) => AttributeDefinition::try_from(row)?,
            None => return Err(AppError::attribute_not_found(id).into()),
        };
        definition.apply(data);

        sqlx::query(
            r#"
            UPDATE attribute_definitions
            SET name = $2, options = $3, description = $4, display_order = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&definition.name)
        .bind(options_json(&definition.kind))
        .bind(&definition.description)
        .bind(definition.display_order)
        .bind(now_millis())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, || name_exists(&definition.name)))?;

        tx.commit().await.map_err(store_error)?;
        Ok(definition)
    }

    async fn retire_definition(&self, id: i64) -> StoreResult<AttributeDefinition> {
        let row: Option<DefinitionRow> = sqlx::query_as(&format!(
            "UPDATE attribute_definitions SET is_active = FALSE, updated_at = $2 \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(now_millis())
        .fetch_optional(self.pool())
        .await
        .map_err(store_error)?;

        match row {
            Some(row) => {
                tracing::info!(attribute_id = id, "Attribute definition retired");
                row.try_into()
            }
            None => Err(AppError::attribute_not_found(id).into()),
        }
    }
}
