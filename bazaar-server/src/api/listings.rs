//! Listing detail endpoint

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::attributes::{LayoutVariant, ListingAttributes};

use crate::services::AttributeService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelQuery {
    pub category_id: i64,
    pub layout: Option<String>,
}

/// Resolved, formatted and arranged attributes of one listing.
///
/// Store failures never surface here; the panel just comes back empty.
pub async fn listing_attributes(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    Query(query): Query<PanelQuery>,
) -> Json<ListingAttributes> {
    let layout = LayoutVariant::parse(query.layout.as_deref());
    let panel = AttributeService::new(&state)
        .listing_panel(query.category_id, listing_id, layout)
        .await;
    Json(panel)
}
