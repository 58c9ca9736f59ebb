//! Test helper module for inventory-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use inventory_service::{
    build_router,
    config::{
        Environment, IamServiceConfig, InventoryConfig, MongoConfig, SearchConfig, SecurityConfig,
    },
    services::MongoDb,
    AppState,
};
use tower::util::ServiceExt;

pub fn test_mongodb_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

/// Create a test configuration.
///
/// IAM and the search index point at a closed port by default; tests that
/// need them override the URLs.
pub fn test_config(database: &str) -> InventoryConfig {
    InventoryConfig {
        common: service_core::config::Config { port: 0 },
        environment: Environment::Dev,
        service_name: "inventory-service-test".to_string(),
        service_version: "0.1.0".to_string(),
        log_level: "error".to_string(),
        mongodb: MongoConfig {
            uri: test_mongodb_uri(),
            database: database.to_string(),
        },
        iam: IamServiceConfig {
            url: "http://127.0.0.1:1".to_string(),
        },
        search: SearchConfig {
            url: std::env::var("TEST_SEARCH_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:1".to_string()),
            index: format!("inventory-items-test-{}", uuid::Uuid::new_v4().simple()),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

/// State whose collaborators are connected lazily; good for exercising paths
/// that fail before any storage or upstream round-trip.
pub async fn lazy_state() -> AppState {
    let config = test_config("inventory_test_lazy");
    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("failed to create MongoDB handle");
    AppState::new(config, db)
}

pub async fn lazy_router() -> Router {
    build_router(lazy_state().await)
        .await
        .expect("failed to build router")
}

/// State backed by a live MongoDB using a unique database per call.
pub async fn spawn_state() -> AppState {
    let database = format!("inventory_test_{}", uuid::Uuid::new_v4().simple());
    let config = test_config(&database);
    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("failed to connect to MongoDB");
    db.initialize_indexes()
        .await
        .expect("failed to initialize indexes");
    AppState::new(config, db)
}

/// Drop the test database created by [`spawn_state`].
pub async fn teardown(state: &AppState) {
    state
        .db
        .database()
        .drop(None)
        .await
        .expect("failed to drop test database");
}

/// Fire one request at the router.
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.expect("request failed")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}
