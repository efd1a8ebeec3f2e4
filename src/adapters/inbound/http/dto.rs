use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    domain::{
        models::{ListItemsQuery, SortDirection},
        value_objects::{ItemId, Price},
    },
    services::{CreateItemCommand, UpdateItemCommand, ValidationErrors},
};

/// DTO for creating items.
///
/// Missing fields fall back to empty values so that the validators, not the
/// JSON extractor, report them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequestDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub price: Price,
}

/// DTO for replacing an item's fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequestDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub price: Price,
}

/// Query string of the listing endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

/// Problem body for requests rejected by validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationProblemDto {
    pub title: String,
    pub status: u16,
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Problem body for failures the caller cannot act on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorProblemDto {
    pub title: String,
    pub status: u16,
}

// Conversion implementations

impl From<CreateItemRequestDto> for CreateItemCommand {
    fn from(dto: CreateItemRequestDto) -> Self {
        CreateItemCommand {
            title: dto.title,
            description: dto.description,
            duration_minutes: dto.duration_minutes,
            price: dto.price,
        }
    }
}

impl UpdateItemRequestDto {
    pub fn into_command(self, id: ItemId) -> UpdateItemCommand {
        UpdateItemCommand {
            id,
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            price: self.price,
        }
    }
}

impl TryFrom<ListItemsParams> for ListItemsQuery {
    type Error = ValidationProblemDto;

    fn try_from(params: ListItemsParams) -> Result<Self, Self::Error> {
        let sort_direction = match params.sort_direction.as_deref() {
            None | Some("") => SortDirection::default(),
            Some(value) => value.parse().map_err(|_| {
                ValidationProblemDto::single(
                    "sortDirection",
                    "Sort direction must be either asc or desc.",
                )
            })?,
        };

        Ok(ListItemsQuery::builder()
            .page(params.page.unwrap_or(1))
            .page_size(params.page_size.unwrap_or(10))
            .maybe_search(params.search)
            .maybe_sort_by(params.sort_by)
            .sort_direction(sort_direction)
            .build())
    }
}

impl ValidationProblemDto {
    pub const TITLE: &'static str = "One or more validation errors occurred.";

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        Self {
            title: Self::TITLE.to_string(),
            status: 400,
            errors,
        }
    }
}

impl From<&ValidationErrors> for ValidationProblemDto {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            title: Self::TITLE.to_string(),
            status: 400,
            errors: errors
                .iter()
                .map(|(field, messages)| (field.to_string(), messages.to_vec()))
                .collect(),
        }
    }
}

impl ErrorProblemDto {
    pub fn unexpected() -> Self {
        Self {
            title: "An unexpected error occurred.".to_string(),
            status: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_create_fields_default_to_empty() {
        let dto: CreateItemRequestDto = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        assert_eq!(dto.title, "");
        assert_eq!(dto.duration_minutes, 0);
        assert_eq!(dto.price, Price::ZERO);
    }

    #[test]
    fn test_list_params_defaults() {
        let query = ListItemsQuery::try_from(ListItemsParams::default()).unwrap();
        assert_eq!(query, ListItemsQuery::default());
    }

    #[test]
    fn test_list_params_direction_is_case_insensitive() {
        let params = ListItemsParams {
            sort_direction: Some("DESC".to_string()),
            ..Default::default()
        };
        let query = ListItemsQuery::try_from(params).unwrap();
        assert_eq!(query.sort_direction, SortDirection::Desc);

        let params = ListItemsParams {
            sort_direction: Some("sideways".to_string()),
            ..Default::default()
        };
        let problem = ListItemsQuery::try_from(params).unwrap_err();
        assert!(problem.errors.contains_key("sortDirection"));
    }
}
