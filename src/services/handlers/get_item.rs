use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::guarded;
use crate::{
    ports::repositories::ItemRepository,
    services::{
        error::ItemServiceResult,
        messages::{GetItemQuery, ItemResponse},
        pipeline::RequestHandler,
    },
};

pub struct GetItemHandler {
    repository: Arc<dyn ItemRepository>,
}

impl GetItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetItemQuery> for GetItemHandler {
    type Response = Option<ItemResponse>;

    async fn handle(
        &self,
        query: GetItemQuery,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<Option<ItemResponse>> {
        let mut unit = guarded(cancel, self.repository.begin()).await?;
        let item = guarded(cancel, unit.get_by_id(query.id)).await?;

        Ok(item.map(ItemResponse::from))
    }
}
