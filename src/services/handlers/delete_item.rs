use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{commit, guarded};
use crate::{
    ports::repositories::ItemRepository,
    services::{error::ItemServiceResult, messages::DeleteItemCommand, pipeline::RequestHandler},
};

pub struct DeleteItemHandler {
    repository: Arc<dyn ItemRepository>,
}

impl DeleteItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<DeleteItemCommand> for DeleteItemHandler {
    /// `false` when there was nothing to delete
    type Response = bool;

    async fn handle(
        &self,
        command: DeleteItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<bool> {
        let mut unit = guarded(cancel, self.repository.begin()).await?;

        let Some(item) = guarded(cancel, unit.get_by_id(command.id)).await? else {
            debug!(item_id = %command.id, "Delete target not found");
            return Ok(false);
        };

        guarded(cancel, unit.delete(&item)).await?;
        commit(cancel, unit).await?;

        info!(item_id = %item.id(), "Item deleted");
        Ok(true)
    }
}
