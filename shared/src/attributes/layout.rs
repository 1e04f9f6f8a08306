//! Layout variants for the attribute panel
//!
//! A layout only arranges already formatted rows; membership and order are
//! fixed by the resolver.

use serde::{Deserialize, Deserializer, Serialize};

use super::presenter::{DisplayStyle, PresentedAttribute, present};
use super::resolver::DegradedSource;
use crate::models::ResolvedAttribute;

/// Closed set of layouts. Anything unrecognized is `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Label/value blocks
    #[default]
    Default,
    /// One-line badges
    Compact,
    /// Two-column table
    Table,
}

impl LayoutVariant {
    pub fn parse(input: Option<&str>) -> Self {
        match input.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("compact") => Self::Compact,
            Some("table") => Self::Table,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Compact => "compact",
            Self::Table => "table",
        }
    }
}

impl<'de> Deserialize<'de> for LayoutVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse(raw.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub style: DisplayStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub value: String,
    pub style: DisplayStyle,
}

/// Formatted rows arranged under one layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum AttributePanel {
    Default { rows: Vec<PresentedAttribute> },
    Compact { badges: Vec<Badge> },
    Table { rows: Vec<TableRow> },
}

impl AttributePanel {
    pub fn arrange(variant: LayoutVariant, rows: Vec<PresentedAttribute>) -> Self {
        match variant {
            LayoutVariant::Default => Self::Default { rows },
            LayoutVariant::Compact => Self::Compact {
                badges: rows
                    .into_iter()
                    .map(|row| Badge {
                        text: format!("{}: {}", row.label, row.display.text),
                        style: row.display.style,
                    })
                    .collect(),
            },
            LayoutVariant::Table => Self::Table {
                rows: rows
                    .into_iter()
                    .map(|row| TableRow {
                        label: row.label,
                        value: row.display.text,
                        style: row.display.style,
                    })
                    .collect(),
            },
        }
    }

    pub fn variant(&self) -> LayoutVariant {
        match self {
            Self::Default { .. } => LayoutVariant::Default,
            Self::Compact { .. } => LayoutVariant::Compact,
            Self::Table { .. } => LayoutVariant::Table,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Default { rows } => rows.len(),
            Self::Compact { badges } => badges.len(),
            Self::Table { rows } => rows.len(),
        }
    }

    /// An empty panel is not rendered at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Format resolved rows and arrange them under `variant`
pub fn render(variant: LayoutVariant, resolved: &[ResolvedAttribute]) -> AttributePanel {
    AttributePanel::arrange(variant, present(resolved))
}

/// Attribute panel of one listing as served to the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAttributes {
    pub listing_id: i64,
    pub category_id: i64,
    #[serde(flatten)]
    pub panel: AttributePanel,
    /// Only populated under `DegradeMode::Flagged`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<DegradedSource>,
}
