use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::guarded;
use crate::{
    domain::models::{ListItemsQuery, PagedResult},
    ports::repositories::ItemRepository,
    services::{error::ItemServiceResult, messages::ItemResponse, pipeline::RequestHandler},
};

pub struct ListItemsHandler {
    repository: Arc<dyn ItemRepository>,
}

impl ListItemsHandler {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<ListItemsQuery> for ListItemsHandler {
    type Response = PagedResult<ItemResponse>;

    async fn handle(
        &self,
        query: ListItemsQuery,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<PagedResult<ItemResponse>> {
        let mut unit = guarded(cancel, self.repository.begin()).await?;
        let (items, total_count) = guarded(cancel, unit.list(&query)).await?;

        let order = query.sort_order();
        debug!(
            page = query.page,
            page_size = query.page_size,
            sort_by = order.column.as_str(),
            sort_direction = ?order.direction,
            returned = items.len(),
            total_count,
            "Listed items"
        );

        // Page and size are echoed as requested, not as storage clamped them
        Ok(
            PagedResult::new(items, total_count, query.page, query.page_size)
                .map(ItemResponse::from),
        )
    }
}
