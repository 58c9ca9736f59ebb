pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::InventoryConfig;
use crate::services::{IamClient, ItemStore, MongoDb, SearchIndex};

#[derive(Clone)]
pub struct AppState {
    pub config: InventoryConfig,
    pub db: MongoDb,
    pub items: ItemStore,
    pub search: SearchIndex,
    pub iam: IamClient,
}

impl AppState {
    pub fn new(config: InventoryConfig, db: MongoDb) -> Self {
        let search = SearchIndex::new(&config.search);
        let iam = IamClient::new(&config.iam);
        let items = ItemStore::new(db.clone(), search.clone());
        Self {
            config,
            db,
            items,
            search,
            iam,
        }
    }
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Every item route requires a token; a single middleware stage validates
    // it against the IAM service before dispatch.
    let item_routes = Router::new()
        .route("/api/v1/inventory/create", post(handlers::items::create_item))
        .route(
            "/api/v1/inventory/create/bulk",
            post(handlers::items::bulk_create_items),
        )
        .route("/api/v1/inventory/items", get(handlers::items::list_items))
        .route(
            "/api/v1/inventory/items/search",
            get(handlers::items::search_items),
        )
        .route(
            "/api/v1/inventory/items/delete/bulk",
            delete(handlers::items::bulk_delete_items),
        )
        .route(
            "/api/v1/inventory/items/:id",
            get(handlers::items::get_item)
                .patch(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_token,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(item_routes)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .map(|o| {
                            o.parse::<HeaderValue>().unwrap_or_else(|e| {
                                tracing::error!(
                                    "Invalid CORS origin '{}': {}. Using fallback.",
                                    o,
                                    e
                                );
                                HeaderValue::from_static("*")
                            })
                        })
                        .collect::<Vec<HeaderValue>>(),
                )
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );

    Ok(app)
}

/// Service health check.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "MongoDB health check failed");
        e
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "checks": {
            "mongodb": "up"
        }
    })))
}
