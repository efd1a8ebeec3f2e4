pub mod item;
pub mod list_query;
pub mod paged_result;

pub use item::{Item, MAX_TITLE_LENGTH};
pub use list_query::{ListItemsQuery, SortColumn, SortDirection, SortOrder};
pub use paged_result::PagedResult;
