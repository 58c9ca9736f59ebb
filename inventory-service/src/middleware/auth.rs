use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use service_core::middleware::auth::extract_token;

use crate::{services::AuthenticatedIdentity, AppState};

/// Identity resolved by the IAM service, attached to request extensions for
/// the duration of handling.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub AuthenticatedIdentity);

/// Enforce token authentication before dispatch by delegating validation to
/// the IAM service. The IAM round-trip happens on every request; nothing is
/// cached.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Reject malformed credentials locally; IAM is only consulted for
    // requests that actually carry a token.
    if extract_token(req.headers()).is_none() {
        return Err(AppError::invalid_token());
    }

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(AppError::invalid_token)?;

    let identity = state.iam.authenticate(&authorization).await?;
    req.extensions_mut().insert(CurrentIdentity(identity));

    Ok(next.run(req).await)
}

/// Extractor to easily get the resolved identity in handlers.
#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentIdentity>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "identity missing from request extensions"
                ))
            })
    }
}
