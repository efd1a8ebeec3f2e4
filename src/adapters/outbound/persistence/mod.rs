mod in_memory_item_repository;
mod sql_item_repository;

pub use in_memory_item_repository::InMemoryItemRepository;
pub use sql_item_repository::SqlItemRepository;
