pub mod repositories;
pub mod services;
pub mod time;

// Re-export all port traits for convenience
pub use repositories::{ItemRepository, ItemUnitOfWork};
pub use services::ItemService;
pub use time::Clock;
