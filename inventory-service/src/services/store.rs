//! Item storage collaborator: MongoDB rows with search-index write-through.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use service_core::error::AppError;
use service_core::resource::{Page, ResourceStore};
use uuid::Uuid;

use crate::dtos::items::ItemUpdateRequest;
use crate::models::{Item, ItemResponse};
use crate::services::{MongoDb, SearchIndex};

/// Index failures never fail the storage operation; the row is the source of
/// truth and the index catches up on the next write.
fn log_index_failure(err: AppError, id: &str) {
    tracing::error!(item_id = %id, error = %err, "search index write-through failed");
}

#[derive(Clone)]
pub struct ItemStore {
    db: MongoDb,
    search: SearchIndex,
}

impl ItemStore {
    pub fn new(db: MongoDb, search: SearchIndex) -> Self {
        Self { db, search }
    }

    fn validate_id(id: &str) -> Result<(), AppError> {
        Uuid::parse_str(id)
            .map(|_| ())
            .map_err(|_| AppError::BadRequest(anyhow::anyhow!("invalid item id")))
    }

    /// Persist one item and index it.
    pub async fn insert(&self, item: &Item) -> Result<(), AppError> {
        self.db.items().insert_one(item, None).await?;

        if let Err(e) = self.search.index_item(&ItemResponse::from(item.clone())).await {
            log_index_failure(e, &item.id);
        }
        Ok(())
    }

    /// Persist a batch of items and index each, returning the created count.
    pub async fn insert_many(&self, items: &[Item]) -> Result<u64, AppError> {
        self.db.items().insert_many(items, None).await?;

        for item in items {
            if let Err(e) = self.search.index_item(&ItemResponse::from(item.clone())).await {
                log_index_failure(e, &item.id);
            }
        }
        Ok(items.len() as u64)
    }
}

#[async_trait]
impl ResourceStore for ItemStore {
    type Entity = ItemResponse;
    type Patch = ItemUpdateRequest;

    fn resource_name(&self) -> &'static str {
        "item"
    }

    fn collection_name(&self) -> &'static str {
        "items"
    }

    async fn list(&self, page: Page) -> Result<Vec<ItemResponse>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(page.offset())
            .limit(page.size() as i64)
            .build();

        let mut cursor = self.db.items().find(None, find_options).await?;

        let mut items = Vec::new();
        while let Some(item) = cursor.try_next().await? {
            items.push(ItemResponse::from(item));
        }
        Ok(items)
    }

    async fn get(&self, id: &str) -> Result<Option<ItemResponse>, AppError> {
        Self::validate_id(id)?;
        let item = self.db.items().find_one(doc! { "_id": id }, None).await?;
        Ok(item.map(ItemResponse::from))
    }

    async fn update(
        &self,
        id: &str,
        patch: ItemUpdateRequest,
    ) -> Result<Option<ItemResponse>, AppError> {
        Self::validate_id(id)?;

        let mut set = Document::new();
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(description) = patch.description {
            set.insert("description", description);
        }
        if let Some(sku) = patch.sku {
            set.insert("sku", sku);
        }
        if let Some(quantity) = patch.quantity {
            set.insert("quantity", quantity);
        }
        if let Some(unit_price) = patch.unit_price {
            set.insert("unit_price", unit_price);
        }
        set.insert("updated_at", mongodb::bson::DateTime::now());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .db
            .items()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?;

        match updated {
            Some(item) => {
                let response = ItemResponse::from(item);
                if let Err(e) = self.search.index_item(&response).await {
                    log_index_failure(e, id);
                }
                Ok(Some(response))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Self::validate_id(id)?;
        let result = self.db.items().delete_one(doc! { "_id": id }, None).await?;

        if result.deleted_count == 1 {
            if let Err(e) = self.search.remove_item(id).await {
                log_index_failure(e, id);
            }
            return Ok(true);
        }
        Ok(false)
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<u64, AppError> {
        // Any unparseable id fails the batch before a single row is touched.
        for id in ids {
            Self::validate_id(id)?;
        }

        let result = self
            .db
            .items()
            .delete_many(doc! { "_id": { "$in": ids } }, None)
            .await?;

        for id in ids {
            if let Err(e) = self.search.remove_item(id).await {
                log_index_failure(e, id);
            }
        }

        Ok(result.deleted_count)
    }
}
