//! Attribute presentation
//!
//! Turns a definition and its value into a semantic display value. No markup,
//! no I/O.

use serde::{Deserialize, Serialize};

use crate::models::{AttributeDefinition, AttributeType, AttributeValue, ResolvedAttribute};

/// Shown for an unset value
pub const PLACEHOLDER: &str = "—";
pub const AFFIRMATIVE: &str = "Yes";
pub const NEGATIVE: &str = "No";

/// Style hint for the display layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    Plain,
    Positive,
    Negative,
    Choice,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayValue {
    pub text: String,
    pub style: DisplayStyle,
}

impl DisplayValue {
    fn new(text: impl Into<String>, style: DisplayStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER, DisplayStyle::Placeholder)
    }
}

/// One formatted row, ready for any layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedAttribute {
    pub attribute_id: i64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub display: DisplayValue,
}

/// Format a value according to its definition's type.
///
/// Callable directly, so it tolerates unset values and values whose variant
/// does not match the definition (those are shown raw).
pub fn format(definition: &AttributeDefinition, value: Option<&AttributeValue>) -> DisplayValue {
    let Some(value) = value else {
        return DisplayValue::placeholder();
    };

    match (&definition.kind, value) {
        (_, AttributeValue::String(s) | AttributeValue::Select(s)) if s.is_empty() => {
            DisplayValue::placeholder()
        }
        (AttributeType::Boolean, AttributeValue::Boolean(true)) => {
            DisplayValue::new(AFFIRMATIVE, DisplayStyle::Positive)
        }
        (AttributeType::Boolean, AttributeValue::Boolean(false)) => {
            DisplayValue::new(NEGATIVE, DisplayStyle::Negative)
        }
        (AttributeType::Number, AttributeValue::Number(n)) => {
            DisplayValue::new(group_thousands(*n), DisplayStyle::Plain)
        }
        (AttributeType::Number, AttributeValue::String(s)) => {
            let text = match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => group_thousands(n),
                _ => s.clone(),
            };
            DisplayValue::new(text, DisplayStyle::Plain)
        }
        (AttributeType::Select { .. }, _) => DisplayValue::new(value.raw_text(), DisplayStyle::Choice),
        _ => DisplayValue::new(value.raw_text(), DisplayStyle::Plain),
    }
}

/// Format every resolved row, keeping order
pub fn present(resolved: &[ResolvedAttribute]) -> Vec<PresentedAttribute> {
    resolved
        .iter()
        .map(|row| PresentedAttribute {
            attribute_id: row.definition.id,
            label: row.definition.name.clone(),
            description: row.definition.description.clone(),
            display: format(&row.definition, row.value.as_ref()),
        })
        .collect()
}

/// `12000` -> `12,000`, `-1234.5` -> `-1,234.5`.
///
/// Non-finite or exponent-form input comes back as its plain rendering.
fn group_thousands(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let raw = AttributeValue::Number(n).raw_text();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return raw.clone();
    }

    let mut grouped = String::with_capacity(raw.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
