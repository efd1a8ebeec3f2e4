use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{Item, ListItemsQuery, SortColumn, SortDirection},
        value_objects::{ItemId, Price},
    },
    ports::repositories::{ItemRepository, ItemUnitOfWork},
};

/// SQL-based implementation of ItemRepository using PostgreSQL.
///
/// Each unit of work is a database transaction; dropping it rolls back.
#[derive(Clone)]
pub struct SqlItemRepository {
    pool: PgPool,
}

impl SqlItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id UUID PRIMARY KEY,
                title VARCHAR(50) NOT NULL,
                description TEXT,
                duration_minutes INTEGER NOT NULL,
                price_cents BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_title ON items(title)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_created_at ON items(created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl ItemRepository for SqlItemRepository {
    async fn begin(&self) -> StorageResult<Box<dyn ItemUnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqlUnitOfWork { tx, writes: 0 }))
    }
}

struct SqlUnitOfWork {
    tx: Transaction<'static, Postgres>,
    writes: usize,
}

const SELECT_COLUMNS: &str =
    "id, title, description, duration_minutes, price_cents, created_at, updated_at";

// Search is a plain substring test so `%` and `_` in the term match literally
const SEARCH_FILTER: &str = "($1::TEXT IS NULL OR strpos(lower(title), lower($1)) > 0)";

fn order_by_clause(query: &ListItemsQuery) -> String {
    let order = query.sort_order();

    // Column names come from a fixed enum, never from caller input
    let column = match order.column {
        SortColumn::Title => "title COLLATE \"C\"",
        SortColumn::Price => "price_cents",
        SortColumn::Duration => "duration_minutes",
        SortColumn::CreatedAt => "created_at",
    };
    let direction = match order.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    format!("ORDER BY {} {}, id ASC", column, direction)
}

fn item_from_row(row: &sqlx::postgres::PgRow) -> StorageResult<Item> {
    let id = ItemId::from_uuid(row.try_get::<Uuid, _>("id")?);
    let title: String = row.try_get("title")?;
    let description: Option<String> = row.try_get("description")?;
    let duration_minutes: i32 = row.try_get("duration_minutes")?;
    let price_cents: i64 = row.try_get("price_cents")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Item::restore(
        id,
        title,
        description,
        duration_minutes,
        Price::from_cents(price_cents),
        created_at,
        updated_at,
    )
    .map_err(|e| StorageError::CorruptRecord {
        id,
        reason: e.to_string(),
    })
}

#[async_trait]
impl ItemUnitOfWork for SqlUnitOfWork {
    async fn add(&mut self, item: Item) -> StorageResult<Item> {
        sqlx::query(
            r#"
            INSERT INTO items (
                id, title, description, duration_minutes,
                price_cents, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id().as_uuid())
        .bind(item.title())
        .bind(item.description())
        .bind(item.duration_minutes())
        .bind(item.price().cents())
        .bind(item.created_at())
        .bind(item.updated_at())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                StorageError::ItemAlreadyExists { id: item.id() }
            }
            _ => StorageError::from(e),
        })?;

        self.writes += 1;
        Ok(item)
    }

    async fn get_by_id(&mut self, id: ItemId) -> StorageResult<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {} FROM items WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(item_from_row).transpose()
    }

    async fn update(&mut self, item: Item) -> StorageResult<Item> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET title = $2,
                description = $3,
                duration_minutes = $4,
                price_cents = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(item.id().as_uuid())
        .bind(item.title())
        .bind(item.description())
        .bind(item.duration_minutes())
        .bind(item.price().cents())
        .bind(item.updated_at())
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ItemNotFound { id: item.id() });
        }

        self.writes += 1;
        Ok(item)
    }

    async fn delete(&mut self, item: &Item) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item.id().as_uuid())
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ItemNotFound { id: item.id() });
        }

        self.writes += 1;
        Ok(())
    }

    async fn list(&mut self, query: &ListItemsQuery) -> StorageResult<(Vec<Item>, u64)> {
        let search = query.search_term();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM items WHERE {}",
            SEARCH_FILTER
        ))
        .bind(search)
        .fetch_one(&mut *self.tx)
        .await?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM items WHERE {} {} LIMIT $2 OFFSET $3",
            SELECT_COLUMNS,
            SEARCH_FILTER,
            order_by_clause(query)
        ))
        .bind(search)
        .bind(query.effective_page_size())
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await?;

        let items = rows.iter().map(item_from_row).collect::<StorageResult<Vec<_>>>()?;
        Ok((items, total.max(0) as u64))
    }

    async fn commit(self: Box<Self>) -> StorageResult<usize> {
        let writes = self.writes;
        self.tx
            .commit()
            .await
            .map_err(|e| StorageError::CommitFailed {
                message: e.to_string(),
            })?;
        Ok(writes)
    }
}

/// Convert sqlx errors to domain storage errors
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::InfrastructureError {
            message: format!("Database error: {}", err),
            source: Some(err.to_string()),
        }
    }
}
