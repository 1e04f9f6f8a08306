//! Listing detail consumer
//!
//! Fetches definitions and values concurrently from the attribute service,
//! resolves them locally and hands back a panel ready to render.

use std::time::Duration;

use shared::attributes::{LayoutVariant, ListingAttributes, render};
use shared::{DegradeMode, Resolver};

use crate::{AttributeClient, ClientConfig, ClientResult};

pub struct ListingAttributesView {
    client: AttributeClient,
    read_timeout: Option<Duration>,
    degrade_mode: DegradeMode,
}

impl ListingAttributesView {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            client: AttributeClient::new(config)?,
            read_timeout: config.read_timeout,
            degrade_mode: config.degrade_mode,
        })
    }

    pub fn client(&self) -> &AttributeClient {
        &self.client
    }

    /// Attribute panel of a listing.
    ///
    /// An unreachable service yields an empty panel, never an error.
    pub async fn panel(
        &self,
        category_id: i64,
        listing_id: i64,
        layout: LayoutVariant,
    ) -> ListingAttributes {
        let mut resolver = Resolver::new(&self.client, &self.client);
        if let Some(limit) = self.read_timeout {
            resolver = resolver.with_read_timeout(limit);
        }
        let resolution = resolver.resolve_detailed(category_id, listing_id).await;

        if resolution.is_degraded() {
            tracing::warn!(
                category_id,
                listing_id,
                base_url = self.client.http().base_url(),
                "Attribute service degraded, rendering empty panel"
            );
        }

        ListingAttributes {
            listing_id,
            category_id,
            panel: render(layout, &resolution.attributes),
            degraded: resolution.reported(self.degrade_mode),
        }
    }

    /// Panel resolved by the service itself
    pub async fn remote_panel(
        &self,
        category_id: i64,
        listing_id: i64,
        layout: LayoutVariant,
    ) -> ClientResult<ListingAttributes> {
        self.client
            .http()
            .get(&format!(
                "listings/{listing_id}/attributes?categoryId={category_id}&layout={}",
                layout.as_str()
            ))
            .await
    }
}
