use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{commit, guarded};
use crate::{
    domain::models::Item,
    ports::{repositories::ItemRepository, time::Clock},
    services::{
        error::ItemServiceResult,
        messages::{CreateItemCommand, ItemResponse},
        pipeline::RequestHandler,
    },
};

pub struct CreateItemHandler {
    repository: Arc<dyn ItemRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl RequestHandler<CreateItemCommand> for CreateItemHandler {
    type Response = ItemResponse;

    async fn handle(
        &self,
        command: CreateItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<ItemResponse> {
        // Fails loudly if the validators and the entity ever drift apart
        let item = Item::new_at(
            command.title,
            command.description,
            command.duration_minutes,
            command.price,
            self.clock.now(),
        )?;

        let mut unit = guarded(cancel, self.repository.begin()).await?;
        let item = guarded(cancel, unit.add(item)).await?;
        commit(cancel, unit).await?;

        info!(item_id = %item.id(), "Item created");
        Ok(ItemResponse::from(&item))
    }
}
