//! Generic resource operations shared by every CRUD surface.
//!
//! Each service implements [`ResourceStore`] for its storage collaborator and
//! instantiates the envelope-producing operations below per resource type.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, validator::Validate)]
pub struct Page {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl Page {
    pub fn number(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        (self.number() - 1) * self.size()
    }
}

/// Storage collaborator contract for one resource type.
///
/// `bulk_delete` must reject the whole batch with `BadRequest` before
/// deleting anything when any id fails to parse; ids that parse but match no
/// row are skipped and simply absent from the returned count.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    type Entity: Serialize + Send + Sync;
    type Patch: Send;

    /// Singular noun used in messages and detail payload keys.
    fn resource_name(&self) -> &'static str;

    /// Plural noun used in messages and list payload keys.
    fn collection_name(&self) -> &'static str;

    async fn list(&self, page: Page) -> Result<Vec<Self::Entity>, AppError>;
    async fn get(&self, id: &str) -> Result<Option<Self::Entity>, AppError>;
    async fn update(&self, id: &str, patch: Self::Patch)
        -> Result<Option<Self::Entity>, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
    async fn bulk_delete(&self, ids: &[String]) -> Result<u64, AppError>;
}

/// Request body for bulk-delete endpoints.
#[derive(Debug, Deserialize, validator::Validate)]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, message = "at least one id is required"))]
    pub ids: Vec<String>,
}

fn not_found<S: ResourceStore>(store: &S) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} not found", store.resource_name()))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("response serialization: {}", e)))
}

/// Success envelope: `message` plus one payload entry keyed by resource name.
fn envelope(message: String, key: &str, payload: Value) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("message".to_string(), Value::String(message));
    body.insert(key.to_string(), payload);
    Value::Object(body)
}

pub async fn list_resources<S: ResourceStore>(
    store: &S,
    page: Page,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entities = store.list(page).await?;
    Ok((
        StatusCode::OK,
        Json(envelope(
            format!("{} retrieved", store.collection_name()),
            store.collection_name(),
            to_json(&entities)?,
        )),
    ))
}

pub async fn get_resource<S: ResourceStore>(
    store: &S,
    id: &str,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = store.get(id).await?.ok_or_else(|| not_found(store))?;
    Ok((
        StatusCode::OK,
        Json(envelope(
            format!("{} retrieved", store.resource_name()),
            store.resource_name(),
            to_json(&entity)?,
        )),
    ))
}

pub async fn patch_resource<S: ResourceStore>(
    store: &S,
    id: &str,
    patch: S::Patch,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = store
        .update(id, patch)
        .await?
        .ok_or_else(|| not_found(store))?;
    Ok((
        StatusCode::OK,
        Json(envelope(
            format!("{} updated", store.resource_name()),
            store.resource_name(),
            to_json(&entity)?,
        )),
    ))
}

pub async fn delete_resource<S: ResourceStore>(
    store: &S,
    id: &str,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if !store.delete(id).await? {
        return Err(not_found(store));
    }
    Ok((
        StatusCode::RESET_CONTENT,
        Json(json!({
            "message": format!("{} deleted", store.resource_name()),
        })),
    ))
}

pub async fn bulk_delete_resources<S: ResourceStore>(
    store: &S,
    req: BulkDeleteRequest,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.ids.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "no ids supplied for bulk delete"
        )));
    }
    let deleted = store.bulk_delete(&req.ids).await?;
    Ok((
        StatusCode::RESET_CONTENT,
        Json(json!({
            "message": format!("{} deleted", store.collection_name()),
            "deleted": deleted,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Serialize, PartialEq)]
    struct Widget {
        id: String,
        label: String,
    }

    struct WidgetPatch {
        label: String,
    }

    struct MemoryStore {
        rows: Mutex<BTreeMap<String, Widget>>,
    }

    impl MemoryStore {
        fn with_rows(n: usize) -> Self {
            let rows = (0..n)
                .map(|i| {
                    let id = format!("id-{:02}", i);
                    (
                        id.clone(),
                        Widget {
                            id,
                            label: format!("widget {}", i),
                        },
                    )
                })
                .collect();
            Self {
                rows: Mutex::new(rows),
            }
        }
    }

    #[async_trait]
    impl ResourceStore for MemoryStore {
        type Entity = Widget;
        type Patch = WidgetPatch;

        fn resource_name(&self) -> &'static str {
            "widget"
        }

        fn collection_name(&self) -> &'static str {
            "widgets"
        }

        async fn list(&self, page: Page) -> Result<Vec<Widget>, AppError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .values()
                .skip(page.offset() as usize)
                .take(page.size() as usize)
                .cloned()
                .collect())
        }

        async fn get(&self, id: &str) -> Result<Option<Widget>, AppError> {
            Ok(self.rows.lock().unwrap().get(id).cloned())
        }

        async fn update(&self, id: &str, patch: WidgetPatch) -> Result<Option<Widget>, AppError> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.get_mut(id).map(|w| {
                w.label = patch.label;
                w.clone()
            }))
        }

        async fn delete(&self, id: &str) -> Result<bool, AppError> {
            Ok(self.rows.lock().unwrap().remove(id).is_some())
        }

        async fn bulk_delete(&self, ids: &[String]) -> Result<u64, AppError> {
            if ids.iter().any(|id| !id.starts_with("id-")) {
                return Err(AppError::BadRequest(anyhow::anyhow!("invalid id in batch")));
            }
            let mut rows = self.rows.lock().unwrap();
            Ok(ids.iter().filter(|id| rows.remove(*id).is_some()).count() as u64)
        }
    }

    #[test]
    fn page_defaults_and_clamping() {
        let page = Page::default();
        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);

        let page = Page {
            page: Some(0),
            page_size: Some(10_000),
        };
        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), MAX_PAGE_SIZE);

        let page = Page {
            page: Some(3),
            page_size: Some(25),
        };
        assert_eq!(page.offset(), 50);
    }

    #[tokio::test]
    async fn list_pages_through_rows() {
        let store = MemoryStore::with_rows(30);
        let page = Page {
            page: Some(2),
            page_size: Some(20),
        };
        let (status, Json(body)) = list_resources(&store, page).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["widgets"].as_array().unwrap().len(), 10);
        assert_eq!(body["message"], "widgets retrieved");
    }

    #[tokio::test]
    async fn get_returns_entity_or_not_found() {
        let store = MemoryStore::with_rows(2);
        let (status, Json(body)) = get_resource(&store, "id-01").await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["widget"]["label"], "widget 1");

        let err = get_resource(&store, "id-99").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_updates_and_echoes_entity() {
        let store = MemoryStore::with_rows(1);
        let patch = WidgetPatch {
            label: "renamed".to_string(),
        };
        let (status, Json(body)) = patch_resource(&store, "id-00", patch).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["widget"]["label"], "renamed");
    }

    #[tokio::test]
    async fn delete_returns_reset_content() {
        let store = MemoryStore::with_rows(1);
        let (status, _) = delete_resource(&store, "id-00").await.unwrap();
        assert_eq!(status, StatusCode::RESET_CONTENT);

        let err = delete_resource(&store, "id-00").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bulk_delete_reports_actual_count() {
        let store = MemoryStore::with_rows(3);
        let req = BulkDeleteRequest {
            ids: vec![
                "id-00".to_string(),
                "id-02".to_string(),
                "id-77".to_string(),
            ],
        };
        let (status, Json(body)) = bulk_delete_resources(&store, req).await.unwrap();
        assert_eq!(status, StatusCode::RESET_CONTENT);
        assert_eq!(body["deleted"], 2);
    }

    #[tokio::test]
    async fn bulk_delete_rejects_empty_and_invalid_batches() {
        let store = MemoryStore::with_rows(3);
        let err = bulk_delete_resources(&store, BulkDeleteRequest { ids: vec![] })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = bulk_delete_resources(
            &store,
            BulkDeleteRequest {
                ids: vec!["id-00".to_string(), "garbage".to_string()],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        // Invalid batch must not delete anything.
        assert!(store.get("id-00").await.unwrap().is_some());
    }
}
