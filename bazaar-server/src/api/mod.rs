//! HTTP API for bazaar-server

pub mod attributes;
pub mod health;
pub mod listings;
pub mod values;

use axum::Router;
use axum::routing::{get, post, put};
use http::{HeaderName, HeaderValue};
use shared::util::snowflake_id;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct SnowflakeRequestId;

impl MakeRequestId for SnowflakeRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&snowflake_id().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, without middleware or state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        // Definitions
        .route("/attributes", post(attributes::create_definition))
        .route(
            "/attributes/by-category/{category_id}",
            get(attributes::list_by_category),
        )
        .route(
            "/attributes/{id}",
            get(attributes::get_definition).put(attributes::update_definition),
        )
        .route("/attributes/{id}/retire", post(attributes::retire_definition))
        .route("/attributes/{id}/option-usage", get(attributes::option_usage))
        // Values
        .route(
            "/attributes/values/{listing_id}",
            get(values::list_values).delete(values::clear_listing),
        )
        .route(
            "/attributes/values/{listing_id}/{attribute_id}",
            put(values::put_value).delete(values::clear_value),
        )
        // Resolved panel
        .route(
            "/listings/{listing_id}/attributes",
            get(listings::listing_attributes),
        )
}

/// Fully configured application: routes, middleware and state
pub fn build_app(state: AppState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            SnowflakeRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}
