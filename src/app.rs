use std::sync::Arc;
use tracing::info;

use crate::{
    adapters::{
        inbound::http::AppState,
        outbound::{
            persistence::{InMemoryItemRepository, SqlItemRepository},
            time::SystemClock,
        },
    },
    ports::{repositories::ItemRepository, services::ItemService, time::Clock},
    services::ItemServiceImpl,
};

/// Configuration for the application
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub repository_backend: RepositoryBackend,
}

/// Repository backend configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepositoryBackend {
    #[default]
    InMemory,
    Database { connection_string: String },
}

impl RepositoryBackend {
    /// Pick a backend from its configured name. The database backend needs
    /// a connection string.
    pub fn from_name(name: &str, database_url: Option<String>) -> Result<Self, AppError> {
        match name.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(RepositoryBackend::InMemory),
            "database" | "db" => {
                let connection_string = database_url.ok_or_else(|| AppError::Configuration {
                    message: "DATABASE_URL is required for the database backend".to_string(),
                })?;
                Ok(RepositoryBackend::Database { connection_string })
            }
            other => Err(AppError::Configuration {
                message: format!("Unknown repository backend: {}", other),
            }),
        }
    }
}

/// Application services container
#[derive(Clone)]
pub struct AppServices {
    pub item_service: Arc<dyn ItemService>,
}

impl AppServices {
    /// State for the HTTP router
    pub fn app_state(&self) -> AppState {
        AppState::new(self.item_service.clone())
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            clock: None,
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure repository backend
    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Replace the wall clock, e.g. with a fixed one in tests
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let repository = self.create_repository().await?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let item_service = ItemServiceImpl::new(repository, clock);

        Ok(AppServices {
            item_service: Arc::new(item_service),
        })
    }

    /// Create the repository based on configuration
    async fn create_repository(&self) -> Result<Arc<dyn ItemRepository>, AppError> {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => {
                info!("Using in-memory item repository");
                Ok(Arc::new(InMemoryItemRepository::new()))
            }
            RepositoryBackend::Database { connection_string } => {
                info!("Using PostgreSQL item repository");
                let repository = SqlItemRepository::connect(connection_string)
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: e.to_string(),
                    })?;
                repository
                    .migrate()
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Migration failed: {}", e),
                    })?;
                Ok(Arc::new(repository))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_repository_backend(RepositoryBackend::InMemory)
        .build()
        .await
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    let repository_backend = match std::env::var("REPOSITORY_BACKEND") {
        Ok(name) => RepositoryBackend::from_name(&name, std::env::var("DATABASE_URL").ok())?,
        Err(_) => RepositoryBackend::InMemory,
    };

    AppBuilder::new()
        .with_repository_backend(repository_backend)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::time::FixedClock, domain::value_objects::Price,
        services::CreateItemCommand,
    };
    use chrono::{TimeZone, Utc};
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_backend_from_name() {
        assert_eq!(
            RepositoryBackend::from_name("memory", None).unwrap(),
            RepositoryBackend::InMemory
        );
        assert_eq!(
            RepositoryBackend::from_name("DB", Some("postgres://localhost/items".into())).unwrap(),
            RepositoryBackend::Database {
                connection_string: "postgres://localhost/items".to_string()
            }
        );
        assert!(matches!(
            RepositoryBackend::from_name("database", None),
            Err(AppError::Configuration { .. })
        ));
        assert!(RepositoryBackend::from_name("redis", None).is_err());
    }

    #[tokio::test]
    async fn test_app_builder_uses_configured_clock() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let app = AppBuilder::new()
            .with_config(AppConfig::default())
            .with_clock(Arc::new(FixedClock::new(now)))
            .build()
            .await
            .unwrap();

        let created = app
            .item_service
            .create_item(
                CreateItemCommand {
                    title: "Yoga".to_string(),
                    description: None,
                    duration_minutes: 60,
                    price: Price::from_cents(1500),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(created.created_at, now);
        assert_eq!(created.updated_at, now);
    }
}
