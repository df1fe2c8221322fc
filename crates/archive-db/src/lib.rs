//! # archive-db
//!
//! Storage layer for the personal archive.
//!
//! This crate provides:
//! - Connection pool management
//! - `PgItemRepository`, the PostgreSQL item store
//! - `MemoryItemRepository`, a process-local store with the same behavior
//!
//! ## Example
//!
//! ```rust,ignore
//! use archive_db::{CreateItemRequest, Database, ItemRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/archives").await?;
//!     db.migrate().await?;
//!
//!     let item = db.items.insert(CreateItemRequest::new("Aspirin").with_price(50.0)).await?;
//!     println!("Created item: {}", item.id);
//!     Ok(())
//! }
//! ```
pub mod items;
pub mod memory;
pub mod pool;

// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use archive_core::*;

pub use items::PgItemRepository;
pub use memory::MemoryItemRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Item repository for CRUD operations.
    pub items: PgItemRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            items: PgItemRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
