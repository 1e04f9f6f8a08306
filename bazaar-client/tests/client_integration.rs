//! Client against a live in-process attribute service

use std::net::SocketAddr;
use std::time::Duration;

use bazaar_client::{
    AttributeClient, AttributePanel, ClientConfig, ClientError, ErrorCode, LayoutVariant,
    ListingAttributesView,
};
use bazaar_server::{AppState, build_app};
use shared::models::{AttributeDefinitionCreate, AttributeDefinitionUpdate, AttributeType, AttributeValue};
use shared::{AttributeDefinitionStore, AttributeValueStore, DegradeMode, MemoryStore, StoreError};

async fn spawn_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_app(AppState::in_memory(MemoryStore::new()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn create(name: &str, kind: AttributeType) -> AttributeDefinitionCreate {
    AttributeDefinitionCreate {
        category_id: 7,
        name: name.to_string(),
        kind,
        description: None,
        display_order: None,
    }
}

#[tokio::test]
async fn test_definition_round_trip() {
    let addr = spawn_server().await;
    let client = AttributeClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();

    let storage = client
        .create_definition(create("Storage", AttributeType::Number))
        .await
        .unwrap();
    let colour = client
        .create_definition(create("Colour", AttributeType::String))
        .await
        .unwrap();

    let listed = client.definitions_for_category(7).await.unwrap();
    assert_eq!(listed.iter().map(|d| d.id).collect::<Vec<_>>(), vec![storage.id, colour.id]);

    let updated = client
        .update_definition(
            colour.id,
            AttributeDefinitionUpdate {
                description: Some("Exterior colour".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Exterior colour"));

    client.retire_definition(colour.id).await.unwrap();
    assert_eq!(client.definitions_for_category(7).await.unwrap().len(), 1);
    let retired = client.definition(colour.id).await.unwrap().unwrap();
    assert!(!retired.is_active);
    assert!(client.definition(123).await.unwrap().is_none());
}

#[tokio::test]
async fn test_business_errors_are_rejections() {
    let addr = spawn_server().await;
    let client = AttributeClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();

    let storage = client
        .create_definition(create("Storage", AttributeType::Number))
        .await
        .unwrap();

    let err = client
        .create_definition(create("Storage", AttributeType::String))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(ref e) if e.code == ErrorCode::AttributeNameExists));

    let err = client
        .put_value(3, storage.id, AttributeValue::String("big".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(ref e) if e.code == ErrorCode::MalformedValue));
}

#[tokio::test]
async fn test_value_round_trip() {
    let addr = spawn_server().await;
    let client = AttributeClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();

    let storage = client
        .create_definition(create("Storage", AttributeType::Number))
        .await
        .unwrap();
    client
        .put_value(3, storage.id, AttributeValue::Number(256.0))
        .await
        .unwrap();

    let values = client.values_for_listing(3).await.unwrap();
    assert_eq!(values[&storage.id].value, serde_json::json!(256));

    assert!(client.clear_value(3, storage.id).await.unwrap());
    assert!(!client.clear_value(3, storage.id).await.unwrap());
    assert_eq!(client.clear_listing(3).await.unwrap(), 0);
    assert!(client.values_for_listing(3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_option_in_use_is_rejected() {
    let addr = spawn_server().await;
    let client = AttributeClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();

    let condition = client
        .create_definition(create(
            "Condition",
            AttributeType::Select {
                options: vec!["new".to_string(), "used".to_string()],
            },
        ))
        .await
        .unwrap();
    client
        .put_value(3, condition.id, AttributeValue::Select("new".to_string()))
        .await
        .unwrap();

    let usage = client.option_usage(condition.id).await.unwrap();
    assert_eq!(usage.get("new"), Some(&1));
    assert!(!usage.contains_key("used"));

    let err = client
        .update_definition(
            condition.id,
            AttributeDefinitionUpdate {
                options: Some(vec!["used".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(ref e) if e.code == ErrorCode::OptionInUse));
}

#[tokio::test]
async fn test_view_resolves_locally_and_remotely() {
    let addr = spawn_server().await;
    let view = ListingAttributesView::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    let client = view.client();

    let warranty = client
        .create_definition(create("Warranty", AttributeType::Boolean))
        .await
        .unwrap();
    client
        .create_definition(create("Mileage", AttributeType::Number))
        .await
        .unwrap();
    client
        .put_value(3, warranty.id, AttributeValue::Boolean(true))
        .await
        .unwrap();

    let local = view.panel(7, 3, LayoutVariant::Compact).await;
    let AttributePanel::Compact { badges } = &local.panel else {
        panic!("expected compact panel");
    };
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0].text, "Warranty: Yes");

    let remote = view.remote_panel(7, 3, LayoutVariant::Compact).await.unwrap();
    assert_eq!(remote, local);
}

#[tokio::test]
async fn test_unreachable_service_yields_empty_panel() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("http://{addr}"))
        .with_timeout(Duration::from_secs(2))
        .with_degrade_mode(DegradeMode::Flagged);
    let view = ListingAttributesView::new(&config).unwrap();

    let listing = view.panel(7, 3, LayoutVariant::Default).await;
    assert!(listing.panel.is_empty());
    assert_eq!(listing.degraded.len(), 2);

    let err = view
        .remote_panel(7, 3, LayoutVariant::Default)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
