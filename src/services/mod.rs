pub mod error;
pub mod handlers;
pub mod messages;
pub mod pipeline;
pub mod validation;

mod item_service_impl;

pub use error::{ItemServiceError, ItemServiceResult};
pub use item_service_impl::{ItemServiceBuilder, ItemServiceImpl};
pub use messages::{
    CreateItemCommand, DeleteItemCommand, GetItemQuery, ItemResponse, UpdateItemCommand,
};
pub use pipeline::{Pipeline, RequestHandler};
pub use validation::{ValidationErrors, ValidatorRegistry};
