pub mod item_handlers;

pub use item_handlers::*;
