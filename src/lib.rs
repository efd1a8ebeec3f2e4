pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    // Errors
    InvariantViolation,
    // Models
    Item,
    // Value objects
    ItemId,
    ListItemsQuery,
    PagedResult,
    Price,
    SortColumn,
    SortDirection,
    StorageError,
};

// Port types - interfaces for external systems
pub use ports::{Clock, ItemRepository, ItemService, ItemUnitOfWork};

// Service implementations - business logic
pub use services::{
    CreateItemCommand, DeleteItemCommand, GetItemQuery, ItemResponse, ItemServiceBuilder,
    ItemServiceError, ItemServiceImpl, UpdateItemCommand, ValidationErrors,
};

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppError, AppServices, RepositoryBackend, create_app_from_env,
    create_in_memory_app,
};

// Adapter types - infrastructure implementations
pub use adapters::{
    inbound::http::{AppState, create_router},
    outbound::{
        persistence::{InMemoryItemRepository, SqlItemRepository},
        time::{FixedClock, SystemClock},
    },
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AppBuilder, AppServices, CreateItemCommand, InMemoryItemRepository, ItemId,
        ItemRepository, ItemService, ItemServiceImpl, ListItemsQuery, Price, SystemClock,
        UpdateItemCommand, create_in_memory_app, create_router,
    };
}
