use super::{RuleSet, ValidatorRegistry};
use crate::{
    domain::models::{ListItemsQuery, SortColumn, MAX_TITLE_LENGTH},
    services::messages::{CreateItemCommand, DeleteItemCommand, UpdateItemCommand},
};

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: i64 = 50;

const TITLE_EMPTY: &str = "Title cannot be empty.";
const TITLE_TOO_LONG: &str = "Title cannot be longer than 50 characters.";
const DURATION_NOT_POSITIVE: &str = "The duration must be greater than zero.";
const PRICE_NOT_POSITIVE: &str = "The price must be greater than zero.";
const ID_EMPTY: &str = "Id cannot be empty.";

fn title_present(title: &str) -> bool {
    !title.trim().is_empty()
}

fn title_fits(title: &str) -> bool {
    title.chars().count() <= MAX_TITLE_LENGTH
}

pub fn create_item_rules() -> RuleSet<CreateItemCommand> {
    RuleSet::<CreateItemCommand>::new()
        .rule("title", TITLE_EMPTY, |c: &CreateItemCommand| title_present(&c.title))
        .rule("title", TITLE_TOO_LONG, |c: &CreateItemCommand| title_fits(&c.title))
        .rule("durationMinutes", DURATION_NOT_POSITIVE, |c: &CreateItemCommand| {
            c.duration_minutes > 0
        })
        .rule("price", PRICE_NOT_POSITIVE, |c: &CreateItemCommand| c.price.is_positive())
}

pub fn update_item_rules() -> RuleSet<UpdateItemCommand> {
    RuleSet::<UpdateItemCommand>::new()
        .rule("id", ID_EMPTY, |c: &UpdateItemCommand| !c.id.is_nil())
        .rule("title", TITLE_EMPTY, |c: &UpdateItemCommand| title_present(&c.title))
        .rule("title", TITLE_TOO_LONG, |c: &UpdateItemCommand| title_fits(&c.title))
        .rule("durationMinutes", DURATION_NOT_POSITIVE, |c: &UpdateItemCommand| {
            c.duration_minutes > 0
        })
        .rule("price", PRICE_NOT_POSITIVE, |c: &UpdateItemCommand| c.price.is_positive())
}

pub fn delete_item_rules() -> RuleSet<DeleteItemCommand> {
    RuleSet::<DeleteItemCommand>::new().rule("id", ID_EMPTY, |c: &DeleteItemCommand| {
        !c.id.is_nil()
    })
}

pub fn list_items_rules() -> RuleSet<ListItemsQuery> {
    let allowed = SortColumn::ALLOWED.join(", ");

    RuleSet::<ListItemsQuery>::new()
        .rule(
            "page",
            "Page must be greater than or equal to 1.",
            |q: &ListItemsQuery| q.page >= 1,
        )
        .rule("pageSize", "Page size must be at least 1.", |q: &ListItemsQuery| {
            q.page_size >= 1
        })
        .rule(
            "pageSize",
            format!("Page size cannot exceed {}.", MAX_PAGE_SIZE),
            |q: &ListItemsQuery| q.page_size <= MAX_PAGE_SIZE,
        )
        // Stricter than storage, which would quietly fall back to creation order
        .rule(
            "sortBy",
            format!("Sorting is only allowed by: {}", allowed),
            |q: &ListItemsQuery| match q.sort_by.as_deref() {
                None | Some("") => true,
                Some(column) => SortColumn::parse(column).is_some(),
            },
        )
}

/// Registry with the rule sets of every item operation.
/// Look-ups by id carry no rules.
pub fn item_validators() -> ValidatorRegistry {
    ValidatorRegistry::new()
        .with::<CreateItemCommand, _>(create_item_rules())
        .with::<UpdateItemCommand, _>(update_item_rules())
        .with::<DeleteItemCommand, _>(delete_item_rules())
        .with::<ListItemsQuery, _>(list_items_rules())
}
