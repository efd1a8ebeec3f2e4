use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{
        models::{ListItemsQuery, PagedResult},
        value_objects::ItemId,
    },
    services::{
        CreateItemCommand, DeleteItemCommand, ItemResponse, ItemServiceResult, UpdateItemCommand,
    },
};

/// Port for item operations.
///
/// Not-found is an ordinary outcome: `None` from get/update and `false` from
/// delete. Errors are reserved for validation failures, broken invariants,
/// storage failures and cancellation.
#[async_trait]
pub trait ItemService: Send + Sync + 'static {
    /// Create a new item
    async fn create_item(
        &self,
        command: CreateItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<ItemResponse>;

    /// Get an item by id
    async fn get_item(
        &self,
        id: ItemId,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<Option<ItemResponse>>;

    /// Replace the mutable fields of an item
    async fn update_item(
        &self,
        command: UpdateItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<Option<ItemResponse>>;

    /// Delete an item, returning whether it existed
    async fn delete_item(
        &self,
        command: DeleteItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<bool>;

    /// List items with filtering, sorting and paging
    async fn list_items(
        &self,
        query: ListItemsQuery,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<PagedResult<ItemResponse>>;
}
