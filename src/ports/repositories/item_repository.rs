use async_trait::async_trait;

use crate::domain::{
    errors::StorageResult,
    models::{Item, ListItemsQuery},
    value_objects::ItemId,
};

/// Storage port for items.
///
/// Every operation runs inside a unit of work opened with [`begin`]. Writes
/// staged on a unit of work become visible to others only when it is
/// committed; dropping it without a commit discards them.
///
/// [`begin`]: ItemRepository::begin
#[async_trait]
pub trait ItemRepository: Send + Sync + 'static {
    /// Open a new unit of work
    async fn begin(&self) -> StorageResult<Box<dyn ItemUnitOfWork>>;
}

/// A single unit of work against the item store
#[async_trait]
pub trait ItemUnitOfWork: Send {
    /// Stage a new item
    async fn add(&mut self, item: Item) -> StorageResult<Item>;

    /// Look an item up, observing writes already staged on this unit of work
    async fn get_by_id(&mut self, id: ItemId) -> StorageResult<Option<Item>>;

    /// Stage the new state of an existing item
    async fn update(&mut self, item: Item) -> StorageResult<Item>;

    /// Stage the removal of an item
    async fn delete(&mut self, item: &Item) -> StorageResult<()>;

    /// Filter, sort and page items. Returns the page and the number of items
    /// matching the filter across all pages.
    async fn list(&mut self, query: &ListItemsQuery) -> StorageResult<(Vec<Item>, u64)>;

    /// Apply all staged writes atomically. Returns the number of rows written.
    async fn commit(self: Box<Self>) -> StorageResult<usize>;
}
