use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{Item, ListItemsQuery},
        value_objects::ItemId,
    },
    ports::repositories::{ItemRepository, ItemUnitOfWork},
};

/// In-memory implementation of ItemRepository for testing and development
#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    data: Arc<RwLock<HashMap<ItemId, Item>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert items directly, bypassing units of work. Existing ids are overwritten.
    pub async fn seed(&self, items: impl IntoIterator<Item = Item>) {
        let mut data = self.data.write().await;
        for item in items {
            data.insert(item.id(), item);
        }
    }

    /// Number of committed items
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn begin(&self) -> StorageResult<Box<dyn ItemUnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            data: self.data.clone(),
            staged: Vec::new(),
        }))
    }
}

#[derive(Clone)]
enum Change {
    Add(Item),
    Update(Item),
    Delete(ItemId),
}

impl Change {
    fn id(&self) -> ItemId {
        match self {
            Change::Add(item) | Change::Update(item) => item.id(),
            Change::Delete(id) => *id,
        }
    }

    /// Apply to `items`, failing if the change no longer fits the committed state
    fn apply(self, items: &mut HashMap<ItemId, Item>) -> StorageResult<()> {
        match self {
            Change::Add(item) => {
                if items.contains_key(&item.id()) {
                    return Err(StorageError::ItemAlreadyExists { id: item.id() });
                }
                items.insert(item.id(), item);
            }
            Change::Update(item) => {
                let Some(slot) = items.get_mut(&item.id()) else {
                    return Err(StorageError::ItemNotFound { id: item.id() });
                };
                *slot = item;
            }
            Change::Delete(id) => {
                if items.remove(&id).is_none() {
                    return Err(StorageError::ItemNotFound { id });
                }
            }
        }
        Ok(())
    }
}

/// Writes are buffered until commit, which applies them under one write lock
struct InMemoryUnitOfWork {
    data: Arc<RwLock<HashMap<ItemId, Item>>>,
    staged: Vec<Change>,
}

impl InMemoryUnitOfWork {
    /// `Some(state)` when this unit of work has already touched `id`
    fn staged_state(&self, id: ItemId) -> Option<Option<&Item>> {
        self.staged.iter().rev().find(|c| c.id() == id).map(|change| match change {
            Change::Add(item) | Change::Update(item) => Some(item),
            Change::Delete(_) => None,
        })
    }

    async fn visible(&self, id: ItemId) -> Option<Item> {
        match self.staged_state(id) {
            Some(state) => state.cloned(),
            None => self.data.read().await.get(&id).cloned(),
        }
    }
}

#[async_trait]
impl ItemUnitOfWork for InMemoryUnitOfWork {
    async fn add(&mut self, item: Item) -> StorageResult<Item> {
        if self.visible(item.id()).await.is_some() {
            return Err(StorageError::ItemAlreadyExists { id: item.id() });
        }

        self.staged.push(Change::Add(item.clone()));
        Ok(item)
    }

    async fn get_by_id(&mut self, id: ItemId) -> StorageResult<Option<Item>> {
        Ok(self.visible(id).await)
    }

    async fn update(&mut self, item: Item) -> StorageResult<Item> {
        if self.visible(item.id()).await.is_none() {
            return Err(StorageError::ItemNotFound { id: item.id() });
        }

        self.staged.push(Change::Update(item.clone()));
        Ok(item)
    }

    async fn delete(&mut self, item: &Item) -> StorageResult<()> {
        if self.visible(item.id()).await.is_none() {
            return Err(StorageError::ItemNotFound { id: item.id() });
        }

        self.staged.push(Change::Delete(item.id()));
        Ok(())
    }

    async fn list(&mut self, query: &ListItemsQuery) -> StorageResult<(Vec<Item>, u64)> {
        let mut snapshot = self.data.read().await.clone();
        // A staged change can stop fitting once another unit of work commits;
        // such a listing fails the same way the later commit would
        for change in self.staged.iter().cloned() {
            change.apply(&mut snapshot)?;
        }

        Ok(run_query(snapshot.into_values(), query))
    }

    async fn commit(self: Box<Self>) -> StorageResult<usize> {
        let InMemoryUnitOfWork { data: store, staged } = *self;
        let count = staged.len();
        if count == 0 {
            return Ok(0);
        }

        let mut data = store.write().await;

        // Build the new state aside so a conflicting change leaves nothing applied
        let mut next = data.clone();
        for change in staged {
            change.apply(&mut next)?;
        }
        *data = next;

        Ok(count)
    }
}

/// Filter, count, sort and page a set of items
fn run_query(items: impl Iterator<Item = Item>, query: &ListItemsQuery) -> (Vec<Item>, u64) {
    let mut matching: Vec<Item> = items.filter(|item| query.matches(item)).collect();
    let total_count = matching.len() as u64;

    let order = query.sort_order();
    matching.sort_by(|a, b| order.compare(a, b));

    let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(query.effective_page_size()).unwrap_or(usize::MAX);

    let page = matching.into_iter().skip(offset).take(limit).collect();
    (page, total_count)
}
