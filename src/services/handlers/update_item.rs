use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{commit, guarded};
use crate::{
    ports::{repositories::ItemRepository, time::Clock},
    services::{
        error::ItemServiceResult,
        messages::{ItemResponse, UpdateItemCommand},
        pipeline::RequestHandler,
    },
};

pub struct UpdateItemHandler {
    repository: Arc<dyn ItemRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl RequestHandler<UpdateItemCommand> for UpdateItemHandler {
    type Response = Option<ItemResponse>;

    async fn handle(
        &self,
        command: UpdateItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<Option<ItemResponse>> {
        let mut unit = guarded(cancel, self.repository.begin()).await?;

        let Some(mut item) = guarded(cancel, unit.get_by_id(command.id)).await? else {
            debug!(item_id = %command.id, "Update target not found");
            return Ok(None);
        };

        item.update(
            command.title,
            command.description,
            command.duration_minutes,
            command.price,
            self.clock.now(),
        )?;

        let item = guarded(cancel, unit.update(item)).await?;
        commit(cancel, unit).await?;

        info!(item_id = %item.id(), "Item updated");
        Ok(Some(ItemResponse::from(&item)))
    }
}
