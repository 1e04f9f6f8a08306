//! Attribute Model
//!
//! Category-scoped attribute definitions and the listing-scoped values
//! stored against them.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Declared type of an attribute.
///
/// Serialized inline with the definition as `"type": "select", "options": [...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
    Boolean,
    Select { options: Vec<String> },
}

impl AttributeType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select { .. } => "select",
        }
    }

    /// Allowed options (empty for non-select types)
    pub fn options(&self) -> &[String] {
        match self {
            Self::Select { options } => options,
            _ => &[],
        }
    }

    /// Whether an empty string means "unset" for this type
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Select { .. })
    }

    /// Convert a raw stored value into the typed value for this attribute.
    ///
    /// `Ok(None)` means unset: JSON null, or an empty string for textual types.
    /// Numbers and booleans also accept their string spellings ("12000", "true").
    pub fn coerce(&self, raw: &Value) -> Result<Option<AttributeValue>, ValueError> {
        if raw.is_null() {
            return Ok(None);
        }

        match (self, raw) {
            (Self::String, Value::String(s)) if s.is_empty() => Ok(None),
            (Self::String, Value::String(s)) => Ok(Some(AttributeValue::String(s.clone()))),

            (Self::Number, Value::Number(n)) => n
                .as_f64()
                .map(|v| Some(AttributeValue::Number(v)))
                .ok_or_else(|| self.mismatch(raw)),
            (Self::Number, Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(AttributeValue::Number(v))),
                _ => Err(self.mismatch(raw)),
            },

            (Self::Boolean, Value::Bool(b)) => Ok(Some(AttributeValue::Boolean(*b))),
            (Self::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Ok(Some(AttributeValue::Boolean(true))),
                "false" => Ok(Some(AttributeValue::Boolean(false))),
                _ => Err(self.mismatch(raw)),
            },

            (Self::Select { .. }, Value::String(s)) if s.is_empty() => Ok(None),
            (Self::Select { options }, Value::String(s)) => {
                if options.iter().any(|o| o == s) {
                    Ok(Some(AttributeValue::Select(s.clone())))
                } else {
                    Err(ValueError::OptionNotAllowed(s.clone()))
                }
            }

            _ => Err(self.mismatch(raw)),
        }
    }

    fn mismatch(&self, raw: &Value) -> ValueError {
        ValueError::TypeMismatch {
            expected: self.name(),
            found: json_kind(raw),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A stored value that does not fit its definition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("\"{0}\" is not one of the allowed options")]
    OptionNotAllowed(String),
}

impl ValueError {
    /// Convert into an API error for the named attribute
    pub fn into_app_error(self, attribute: &str) -> AppError {
        match self {
            ValueError::TypeMismatch { .. } => {
                AppError::malformed_value(attribute, self.to_string())
            }
            ValueError::OptionNotAllowed(ref value) => AppError::with_message(
                ErrorCode::OptionNotAllowed,
                format!("Invalid value for {}: {}", attribute, self),
            )
            .with_detail("attribute", attribute)
            .with_detail("value", value.clone()),
        }
    }
}

/// Typed attribute value, variant matching [`AttributeType`]
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Select(String),
}

impl AttributeValue {
    /// JSON form used for storage and the wire.
    ///
    /// Integral numbers are written without a fraction so `0` stays `0`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) | Self::Select(s) => Value::String(s.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                }
            }
        }
    }

    /// Untransformed text of the value
    pub fn raw_text(&self) -> String {
        match self {
            Self::String(s) | Self::Select(s) => s.clone(),
            Self::Boolean(b) => b.to_string(),
            Self::Number(_) => self.to_json().to_string(),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Stored value as served by the values endpoint: `{"value": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: Value,
}

impl StoredValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl From<AttributeValue> for StoredValue {
    fn from(value: AttributeValue) -> Self {
        Self {
            value: value.to_json(),
        }
    }
}

/// Values of one listing, keyed by attribute definition id
pub type ValueMap = HashMap<i64, StoredValue>;

/// Attribute definition entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    #[serde(flatten)]
    pub kind: AttributeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Authored position within the category
    #[serde(default)]
    pub display_order: i32,
    /// Retired definitions keep their values but are no longer served
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl AttributeDefinition {
    /// Apply an already-validated update payload
    pub fn apply(&mut self, update: AttributeDefinitionUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(display_order) = update.display_order {
            self.display_order = display_order;
        }
        if let (Some(options), AttributeType::Select { .. }) = (update.options, &self.kind) {
            self.kind = AttributeType::Select { options };
        }
    }
}

/// Create attribute definition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinitionCreate {
    pub category_id: i64,
    pub name: String,
    #[serde(flatten)]
    pub kind: AttributeType,
    pub description: Option<String>,
    /// Appended after the last definition of the category when absent
    pub display_order: Option<i32>,
}

impl AttributeDefinitionCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        if let AttributeType::Select { options } = &self.kind {
            validate_options(options)?;
        }
        Ok(())
    }
}

/// Update attribute definition payload
///
/// The type itself is fixed once created: changing it would orphan every
/// stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinitionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub options: Option<Vec<String>>,
    pub display_order: Option<i32>,
}

impl AttributeDefinitionUpdate {
    pub fn validate(&self, current: &AttributeType) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(options) = &self.options {
            if !matches!(current, AttributeType::Select { .. }) {
                return Err(AppError::validation(format!(
                    "Options can only be set on select attributes, not {}",
                    current.name()
                )));
            }
            validate_options(options)?;
        }
        Ok(())
    }

    /// Options of `current` that this update drops, in their old order.
    pub fn removed_options(&self, current: &AttributeType) -> Vec<String> {
        match &self.options {
            Some(next) => current
                .options()
                .iter()
                .filter(|o| !next.contains(o))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "Attribute name is required",
        )
        .with_detail("field", "name"));
    }
    Ok(())
}

fn validate_options(options: &[String]) -> Result<(), AppError> {
    if options.is_empty() {
        return Err(AppError::new(ErrorCode::AttributeOptionsRequired));
    }
    let mut seen = HashSet::new();
    for option in options {
        if option.is_empty() {
            return Err(AppError::validation("Select options must not be empty"));
        }
        if !seen.insert(option.as_str()) {
            return Err(AppError::validation(format!(
                "Duplicate select option \"{}\"",
                option
            )));
        }
    }
    Ok(())
}

/// Read-time join of a definition with its value. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAttribute {
    pub definition: AttributeDefinition,
    pub value: Option<AttributeValue>,
    pub has_value: bool,
}
