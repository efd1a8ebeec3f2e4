use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{create_item, delete_item, get_item, health, list_items, update_item};
use crate::ports::services::ItemService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub item_service: Arc<dyn ItemService>,
}

impl AppState {
    pub fn new(item_service: Arc<dyn ItemService>) -> Self {
        Self { item_service }
    }
}

/// Create the item routes without any middleware
pub fn create_item_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/items", create_item_router())
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        // Add state for dependency injection
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::{persistence::InMemoryItemRepository, time::SystemClock},
        services::ItemServiceImpl,
    };
    use axum_test::TestServer;

    fn create_test_app_state() -> AppState {
        let repository = Arc::new(InMemoryItemRepository::new());
        let service = ItemServiceImpl::new(repository, Arc::new(SystemClock));
        AppState::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_id_format_is_not_found() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();

        let response = server.get("/api/items/not-a-uuid").await;
        response.assert_status_not_found();
    }
}
