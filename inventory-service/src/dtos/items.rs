use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemCreateRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    pub description: Option<String>,
    pub sku: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "unit price must not be negative"))]
    pub unit_price: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ItemBulkCreateRequest {
    #[validate(length(min = 1, message = "at least one item is required"), nested)]
    pub items: Vec<ItemCreateRequest>,
}

/// Partial update accepted by the item detail PATCH endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ItemUpdateRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub sku: Option<String>,

    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i64>,

    #[validate(range(min = 0.0, message = "unit price must not be negative"))]
    pub unit_price: Option<f64>,
}

/// Query parameters for the search endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(min = 1, message = "search query must not be empty"))]
    pub q: String,
    pub sku: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_empty_name() {
        let req = ItemCreateRequest {
            name: String::new(),
            description: None,
            sku: None,
            quantity: 0,
            unit_price: 0.0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_rejects_negative_quantity() {
        let req = ItemCreateRequest {
            name: "bolt".to_string(),
            description: None,
            sku: None,
            quantity: -1,
            unit_price: 0.0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn bulk_create_validates_nested_items() {
        let req = ItemBulkCreateRequest {
            items: vec![ItemCreateRequest {
                name: String::new(),
                description: None,
                sku: None,
                quantity: 1,
                unit_price: 1.0,
            }],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(ItemUpdateRequest::default().validate().is_ok());
    }
}
