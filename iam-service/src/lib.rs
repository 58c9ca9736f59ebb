pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

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

use crate::config::IamConfig;
use crate::services::{Authenticator, Database, TokenIssuer};

#[derive(Clone)]
pub struct AppState {
    pub config: IamConfig,
    pub db: Database,
    pub authenticator: Authenticator,
    pub token_issuer: TokenIssuer,
}

impl AppState {
    pub fn new(config: IamConfig, db: Database) -> Self {
        Self {
            authenticator: Authenticator::new(db.clone()),
            token_issuer: TokenIssuer::new(db.clone()),
            db,
            config,
        }
    }
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Routes grouped by required authentication level; one middleware stage
    // per group enforces the level before any handler body runs. The
    // authenticate endpoint resolves the token itself so it can return the
    // token record alongside the identity.
    let public_routes = Router::new()
        .route("/api/v1/iam/signup", post(handlers::auth::signup))
        .route("/api/v1/iam/login", post(handlers::auth::login))
        .route("/api/v1/iam/authenticate", post(handlers::auth::authenticate));

    let token_routes = Router::new()
        .route("/api/v1/iam/users", get(handlers::users::list_users))
        .route(
            "/api/v1/iam/users/:id",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_token,
        ));

    let superuser_routes = Router::new()
        .route(
            "/api/v1/iam/users/:id",
            delete(handlers::users::delete_user),
        )
        .route(
            "/api/v1/iam/users/delete/bulk",
            delete(handlers::users::bulk_delete_users),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_superuser,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(token_routes)
        .merge(superuser_routes)
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
        tracing::error!(error = %e, "PostgreSQL health check failed");
        e
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "checks": {
            "postgres": "up"
        }
    })))
}
