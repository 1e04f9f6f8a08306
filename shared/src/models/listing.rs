//! Listing Model

use serde::{Deserialize, Serialize};

/// Listing entity (only the parts the attribute model cares about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
}

impl Listing {
    /// Category whose attribute schema applies to this listing.
    ///
    /// The subcategory wins when set.
    pub fn attribute_scope(&self) -> i64 {
        self.subcategory_id.unwrap_or(self.category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_scope_prefers_subcategory() {
        let mut listing = Listing {
            id: 1,
            title: "Hatchback".to_string(),
            category_id: 10,
            subcategory_id: None,
        };
        assert_eq!(listing.attribute_scope(), 10);

        listing.subcategory_id = Some(11);
        assert_eq!(listing.attribute_scope(), 11);
    }
}
