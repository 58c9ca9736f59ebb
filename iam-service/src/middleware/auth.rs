use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::{models::User, AppState};

/// Identity resolved by the auth middleware, attached to request extensions
/// for the duration of handling. Never cached across requests.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Enforce token authentication before dispatch.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (user, _token) = state.authenticator.authenticate(req.headers()).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Enforce token authentication plus the superuser flag before dispatch.
pub async fn require_superuser(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (user, _token) = state
        .authenticator
        .authenticate_superuser(req.headers())
        .await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Extractor to easily get the resolved identity in handlers.
#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "identity missing from request extensions"
                ))
            })
    }
}
