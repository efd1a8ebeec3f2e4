use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use http::{StatusCode, header};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error};

use crate::{
    adapters::inbound::http::{
        dto::{
            CreateItemRequestDto, ErrorProblemDto, ListItemsParams, UpdateItemRequestDto,
            ValidationProblemDto,
        },
        router::AppState,
    },
    domain::{
        models::{ListItemsQuery, PagedResult},
        value_objects::ItemId,
    },
    services::{DeleteItemCommand, ItemResponse, ItemServiceError},
};

/// Failure responses of the item endpoints
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationProblemDto),
    NotFound,
    Unexpected,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(problem) => (StatusCode::BAD_REQUEST, Json(problem)).into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Unexpected => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorProblemDto::unexpected()),
            )
                .into_response(),
        }
    }
}

impl From<ItemServiceError> for ApiError {
    fn from(err: ItemServiceError) -> Self {
        match err {
            ItemServiceError::ValidationFailed(errors) => {
                ApiError::Validation(ValidationProblemDto::from(&errors))
            }
            ItemServiceError::Cancelled => {
                debug!("Request cancelled before completion");
                ApiError::Unexpected
            }
            other => {
                error!(error = %other, "Unhandled error while processing request");
                ApiError::Unexpected
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationProblemDto::single("body", &rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(ValidationProblemDto::single("query", &rejection.body_text()))
    }
}

/// A token that fires when the request future is dropped, e.g. on client
/// disconnect.
fn request_token() -> (CancellationToken, DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

// Ids that are not UUIDs cannot name an item
fn parse_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Handle item creation
pub async fn create_item(
    State(app_state): State<AppState>,
    body: Result<Json<CreateItemRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(dto) = body?;
    let (cancel, _guard) = request_token();

    let item = app_state
        .item_service
        .create_item(dto.into(), &cancel)
        .await?;

    let location = format!("/api/items/{}", item.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    ))
}

/// Handle fetching a single item
pub async fn get_item(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id)?;
    let (cancel, _guard) = request_token();

    app_state
        .item_service
        .get_item(id, &cancel)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Handle listing items
pub async fn list_items(
    State(app_state): State<AppState>,
    params: Result<Query<ListItemsParams>, QueryRejection>,
) -> Result<Json<PagedResult<ItemResponse>>, ApiError> {
    let Query(params) = params?;
    let query = ListItemsQuery::try_from(params).map_err(ApiError::Validation)?;
    let (cancel, _guard) = request_token();

    let page = app_state.item_service.list_items(query, &cancel).await?;
    Ok(Json(page))
}

/// Handle replacing an item
pub async fn update_item(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateItemRequestDto>, JsonRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(dto) = body?;
    let (cancel, _guard) = request_token();

    app_state
        .item_service
        .update_item(dto.into_command(id), &cancel)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Handle item deletion
pub async fn delete_item(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let (cancel, _guard) = request_token();

    let deleted = app_state
        .item_service
        .delete_item(DeleteItemCommand { id }, &cancel)
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Liveness probe
pub async fn health() -> StatusCode {
    StatusCode::OK
}
