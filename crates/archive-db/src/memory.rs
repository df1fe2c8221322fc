//! In-memory item repository.
//!
//! Used for local runs without PostgreSQL and by the HTTP tests. All
//! mutations go through a single `RwLock`, so writes are serialized and the
//! last write wins.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use archive_core::{CreateItemRequest, Error, Item, ItemRepository, Result, UpdateItemRequest};

#[derive(Debug, Default)]
pub struct MemoryItemRepository {
    items: RwLock<Vec<Item>>,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of items, e.g. fixtures.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn insert(&self, req: CreateItemRequest) -> Result<Item> {
        let req = req.validate()?;
        let item = Item::from_request(Uuid::now_v7(), req, Utc::now());
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn fetch(&self, id: Uuid) -> Result<Item> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(Error::ItemNotFound(id))
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let mut items = self.items.read().await.clone();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    async fn update(&self, id: Uuid, req: UpdateItemRequest) -> Result<Item> {
        let req = req.validate()?;
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(Error::ItemNotFound(id))?;
        item.apply_update(req, Utc::now());
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(Error::ItemNotFound(id))?;
        items.remove(index);
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.items.read().await.iter().any(|item| item.id == id))
    }
}
