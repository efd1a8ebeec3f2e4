use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    models::Item,
    value_objects::{ItemId, Price},
};

/// Request to create a new item
#[derive(Debug, Clone, PartialEq)]
pub struct CreateItemCommand {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Price,
}

/// Request to look an item up by id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetItemQuery {
    pub id: ItemId,
}

/// Request to replace all mutable fields of an item
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItemCommand {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Price,
}

/// Request to delete an item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteItemCommand {
    pub id: ItemId,
}

/// Response shape of a single item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        ItemResponse {
            id: item.id(),
            title: item.title().to_string(),
            description: item.description().map(str::to_string),
            duration_minutes: item.duration_minutes(),
            price: item.price(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        ItemResponse::from(&item)
    }
}
