//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Two levels only: a category with `parent_id = None`, or a subcategory
/// pointing at one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub parent_id: Option<i64>,
}

impl Category {
    pub fn is_subcategory(&self) -> bool {
        self.parent_id.is_some()
    }
}
