mod create_item;
mod delete_item;
mod get_item;
mod list_items;
mod update_item;

pub use create_item::CreateItemHandler;
pub use delete_item::DeleteItemHandler;
pub use get_item::GetItemHandler;
pub use list_items::ListItemsHandler;
pub use update_item::UpdateItemHandler;

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::errors::StorageResult,
    ports::repositories::ItemUnitOfWork,
    services::error::{ItemServiceError, ItemServiceResult},
};

/// Run a storage call, giving up as soon as `cancel` fires.
/// The token is checked before the call, raced against it, and checked again
/// once it has completed.
async fn guarded<T, F>(cancel: &CancellationToken, operation: F) -> ItemServiceResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    if cancel.is_cancelled() {
        return Err(ItemServiceError::Cancelled);
    }

    let value = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ItemServiceError::Cancelled),
        result = operation => result?,
    };

    if cancel.is_cancelled() {
        return Err(ItemServiceError::Cancelled);
    }
    Ok(value)
}

/// Commit a unit of work unless `cancel` has already fired.
///
/// The commit itself is not raced: once started it is the point at which the
/// operation takes effect, and reporting `Cancelled` afterwards would be wrong.
async fn commit(cancel: &CancellationToken, unit: Box<dyn ItemUnitOfWork>) -> ItemServiceResult<()> {
    if cancel.is_cancelled() {
        return Err(ItemServiceError::Cancelled);
    }
    unit.commit().await?;
    Ok(())
}
