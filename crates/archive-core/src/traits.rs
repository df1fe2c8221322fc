//! Core traits for archive storage.
//!
//! The HTTP layer depends only on `ItemRepository`, so PostgreSQL and the
//! in-memory store are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CreateItemRequest, Item, UpdateItemRequest};

// =============================================================================
// ITEM REPOSITORY
// =============================================================================

/// Repository for item CRUD operations.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Validate and insert a new item. The store assigns id and timestamps.
    async fn insert(&self, req: CreateItemRequest) -> Result<Item>;

    /// Fetch a single item by ID.
    async fn fetch(&self, id: Uuid) -> Result<Item>;

    /// List all items, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Item>>;

    /// Merge the supplied fields into an existing item.
    async fn update(&self, id: Uuid, req: UpdateItemRequest) -> Result<Item>;

    /// Delete an item.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Check if an item exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
impl<T: ItemRepository + ?Sized> ItemRepository for Arc<T> {
    async fn insert(&self, req: CreateItemRequest) -> Result<Item> {
        (**self).insert(req).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Item> {
        (**self).fetch(id).await
    }

    async fn list(&self) -> Result<Vec<Item>> {
        (**self).list().await
    }

    async fn update(&self, id: Uuid, req: UpdateItemRequest) -> Result<Item> {
        (**self).update(id, req).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        (**self).delete(id).await
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        (**self).exists(id).await
    }
}
