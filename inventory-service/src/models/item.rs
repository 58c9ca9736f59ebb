use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::items::ItemCreateRequest;

/// Inventory item as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(req: ItemCreateRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            description: req.description,
            sku: req.sku,
            quantity: req.quantity,
            unit_price: req.unit_price,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Item record as serialized in API responses and the search index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            sku: item.sku,
            quantity: item.quantity,
            unit_price: item.unit_price,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> ItemCreateRequest {
        ItemCreateRequest {
            name: "M3 hex bolt".to_string(),
            description: Some("Stainless, 12mm".to_string()),
            sku: Some("BOLT-M3-12".to_string()),
            quantity: 250,
            unit_price: 0.04,
        }
    }

    #[test]
    fn new_item_gets_id_and_timestamps() {
        let item = Item::new(create_request());
        assert!(Uuid::parse_str(&item.id).is_ok());
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.quantity, 250);
    }

    #[test]
    fn response_uses_plain_id_key() {
        let item = Item::new(create_request());
        let body = serde_json::to_value(ItemResponse::from(item.clone())).unwrap();
        assert_eq!(body["id"], item.id);
        assert!(body.get("_id").is_none());
        assert_eq!(body["sku"], "BOLT-M3-12");
    }
}
