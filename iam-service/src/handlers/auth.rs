use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::{
    dtos::auth::{LoginRequest, LoginResponse, SignupRequest},
    models::User,
    utils::{hash_password, verify_password, Password},
    AppState,
};

/// Create a new user account.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.clone();

    let password_hash = match hash_password(&Password::new(req.password)) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, email = %email, "Error creating new user");
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "error creating new user"
            )));
        }
    };

    let user = User::new(
        req.email,
        req.username,
        password_hash.into_string(),
        req.first_name,
        req.last_name,
    );

    // Uniqueness violations and storage failures alike collapse to one
    // generic response; the cause stays in the server log.
    if let Err(e) = state.db.insert_user(&user).await {
        tracing::error!(error = %e, email = %email, "Error creating new user");
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "error creating new user"
        )));
    }

    tracing::info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "new user created successfully" })),
    ))
}

/// Log in with email and password, receiving a fresh auth token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("user not found")))?;

    if !verify_password(&Password::new(req.password), &user.password_hash) {
        return Err(AppError::BadRequest(anyhow::anyhow!("invalid password")));
    }

    let token = state.token_issuer.issue(&user).await?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "auth token generated".to_string(),
            email: user.email,
            token: token.key,
        }),
    ))
}

/// Service-to-service token validation.
///
/// Authenticates the caller's token and returns the resolved identity plus
/// the token record, letting another service trust the result without
/// re-validating. Unauthorized responses come straight from the
/// Authenticator.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state.authenticator.authenticate(&headers).await?;

    let mut user_payload = serde_json::to_value(user.sanitized())
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("response serialization: {}", e)))?;
    // The calling service cannot parse a non-primitive key; surface the
    // storage-layer id explicitly as a string.
    user_payload["id"] = Value::String(user.id.to_string());

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "token authenticated",
            "user": user_payload,
            "token": token,
        })),
    ))
}
