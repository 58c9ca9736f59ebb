//! Inventory item endpoints. CRUD goes through the generic resource
//! operations; create and search are item-specific.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use service_core::error::AppError;
use service_core::extract::{ValidatedJson, ValidatedQuery};
use service_core::resource::{self, BulkDeleteRequest, Page};

use crate::{
    dtos::items::{ItemBulkCreateRequest, ItemCreateRequest, ItemUpdateRequest, SearchParams},
    middleware::CurrentIdentity,
    models::{Item, ItemResponse},
    AppState,
};

pub async fn create_item(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    ValidatedJson(req): ValidatedJson<ItemCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = Item::new(req);

    // Storage failures collapse to one generic response; the cause stays in
    // the server log.
    if let Err(e) = state.items.insert(&item).await {
        tracing::error!(error = %e, item_id = %item.id, "Error creating inventory item");
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "error creating inventory item"
        )));
    }

    tracing::info!(item_id = %item.id, actor = %identity.0.id, "Inventory item created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "inventory item created successfully",
            "item": ItemResponse::from(item),
        })),
    ))
}

pub async fn bulk_create_items(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    ValidatedJson(req): ValidatedJson<ItemBulkCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let items: Vec<Item> = req.items.into_iter().map(Item::new).collect();

    let created = match state.items.insert_many(&items).await {
        Ok(created) => created,
        Err(e) => {
            tracing::error!(error = %e, "Error creating inventory items");
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "error creating inventory items"
            )));
        }
    };

    tracing::info!(created = created, actor = %identity.0.id, "Inventory items created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "inventory items created successfully",
            "created": created,
        })),
    ))
}

pub async fn list_items(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    resource::list_resources(&state.items, page).await
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    resource::get_resource(&state.items, &id).await
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<ItemUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    resource::patch_resource(&state.items, &id, patch).await
}

pub async fn delete_item(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(actor = %identity.0.id, target = %id, "Item delete requested");
    resource::delete_resource(&state.items, &id).await
}

pub async fn bulk_delete_items(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    ValidatedJson(req): ValidatedJson<BulkDeleteRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(actor = %identity.0.id, count = req.ids.len(), "Item bulk delete requested");
    resource::bulk_delete_resources(&state.items, req).await
}

pub async fn search_items(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    if params.q.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "search query must not be empty"
        )));
    }

    let page = Page {
        page: params.page,
        page_size: params.page_size,
    };

    let results = state
        .search
        .search(&params.q, params.sku.as_deref(), page)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "search results retrieved",
            "results": results,
        })),
    ))
}
