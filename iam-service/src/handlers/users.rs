//! User CRUD endpoints, instantiated over the generic resource operations.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use service_core::error::AppError;
use service_core::extract::{ValidatedJson, ValidatedQuery};
use service_core::resource::{self, BulkDeleteRequest, Page};

use crate::{dtos::users::UserUpdateRequest, middleware::CurrentUser, AppState};

pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    resource::list_resources(&state.db, page).await
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    resource::get_resource(&state.db, &id).await
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UserUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    resource::patch_resource(&state.db, &id, patch).await
}

pub async fn delete_user(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(actor = %actor.0.id, target = %id, "User delete requested");
    resource::delete_resource(&state.db, &id).await
}

pub async fn bulk_delete_users(
    State(state): State<AppState>,
    actor: CurrentUser,
    ValidatedJson(req): ValidatedJson<BulkDeleteRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(actor = %actor.0.id, count = req.ids.len(), "User bulk delete requested");
    resource::bulk_delete_resources(&state.db, req).await
}
