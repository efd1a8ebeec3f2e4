use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    domain::{
        models::{ListItemsQuery, PagedResult},
        value_objects::ItemId,
    },
    ports::{repositories::ItemRepository, services::ItemService, time::Clock},
    services::{
        error::ItemServiceResult,
        handlers::{
            CreateItemHandler, DeleteItemHandler, GetItemHandler, ListItemsHandler,
            UpdateItemHandler,
        },
        messages::{CreateItemCommand, DeleteItemCommand, GetItemQuery, ItemResponse, UpdateItemCommand},
        pipeline::Pipeline,
        validation::{item_validators, ValidatorRegistry},
    },
};

/// Implementation of ItemService that routes every operation through the
/// validation pipeline to its handler
#[derive(Clone)]
pub struct ItemServiceImpl {
    pipeline: Pipeline,
    create: Arc<CreateItemHandler>,
    get: Arc<GetItemHandler>,
    update: Arc<UpdateItemHandler>,
    delete: Arc<DeleteItemHandler>,
    list: Arc<ListItemsHandler>,
}

impl ItemServiceImpl {
    /// Create a service with the standard item validators
    pub fn new(repository: Arc<dyn ItemRepository>, clock: Arc<dyn Clock>) -> Self {
        Self::with_validators(repository, clock, Arc::new(item_validators()))
    }

    pub fn with_validators(
        repository: Arc<dyn ItemRepository>,
        clock: Arc<dyn Clock>,
        validators: Arc<ValidatorRegistry>,
    ) -> Self {
        Self {
            pipeline: Pipeline::new(validators),
            create: Arc::new(CreateItemHandler::new(repository.clone(), clock.clone())),
            get: Arc::new(GetItemHandler::new(repository.clone())),
            update: Arc::new(UpdateItemHandler::new(repository.clone(), clock)),
            delete: Arc::new(DeleteItemHandler::new(repository.clone())),
            list: Arc::new(ListItemsHandler::new(repository)),
        }
    }
}

#[async_trait]
impl ItemService for ItemServiceImpl {
    #[instrument(skip(self, command, cancel), fields(title = %command.title))]
    async fn create_item(
        &self,
        command: CreateItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<ItemResponse> {
        self.pipeline.send(self.create.as_ref(), command, cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn get_item(
        &self,
        id: ItemId,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<Option<ItemResponse>> {
        self.pipeline
            .send(self.get.as_ref(), GetItemQuery { id }, cancel)
            .await
    }

    #[instrument(skip(self, command, cancel), fields(item_id = %command.id))]
    async fn update_item(
        &self,
        command: UpdateItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<Option<ItemResponse>> {
        self.pipeline.send(self.update.as_ref(), command, cancel).await
    }

    #[instrument(skip(self, command, cancel), fields(item_id = %command.id))]
    async fn delete_item(
        &self,
        command: DeleteItemCommand,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<bool> {
        self.pipeline.send(self.delete.as_ref(), command, cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn list_items(
        &self,
        query: ListItemsQuery,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<PagedResult<ItemResponse>> {
        self.pipeline.send(self.list.as_ref(), query, cancel).await
    }
}

/// Builder for ItemServiceImpl
pub struct ItemServiceBuilder {
    repository: Option<Arc<dyn ItemRepository>>,
    clock: Option<Arc<dyn Clock>>,
    validators: Option<Arc<ValidatorRegistry>>,
}

impl ItemServiceBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            clock: None,
            validators: None,
        }
    }

    pub fn repository(mut self, repository: Arc<dyn ItemRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the standard item validators
    pub fn validators(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = Some(Arc::new(validators));
        self
    }

    pub fn build(self) -> Result<ItemServiceImpl, &'static str> {
        let repository = self.repository.ok_or("Repository is required")?;
        let clock = self.clock.ok_or("Clock is required")?;
        let validators = self
            .validators
            .unwrap_or_else(|| Arc::new(item_validators()));

        Ok(ItemServiceImpl::with_validators(repository, clock, validators))
    }
}

impl Default for ItemServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
