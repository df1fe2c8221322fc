//! Item repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use archive_core::{
    CreateItemRequest, Error, Item, ItemRepository, Price, Result, UpdateItemRequest,
};

const ITEM_COLUMNS: &str =
    "id, name, year, price, tag, note, image, created_at_utc, updated_at_utc";

/// PostgreSQL implementation of ItemRepository.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: Pool<Postgres>,
}

impl PgItemRepository {
    /// Create a new PgItemRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_row(r: &PgRow) -> Item {
        Item {
            id: r.get("id"),
            name: r.get("name"),
            year: r.get("year"),
            price: r.get::<Option<f64>, _>("price").map(Price::Amount),
            tag: r.get("tag"),
            note: r.get("note"),
            image: r.get("image"),
            created_at: r.get("created_at_utc"),
            updated_at: r.get("updated_at_utc"),
        }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn insert(&self, req: CreateItemRequest) -> Result<Item> {
        let req = req.validate()?;
        let id = Uuid::now_v7();
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO item (id, name, year, price, tag, note, image, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.name)
        .bind(req.year)
        .bind(req.price)
        .bind(&req.tag)
        .bind(&req.note)
        .bind(&req.image)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(item_id = %id, "item: insert");
        Ok(Self::map_row(&row))
    }

    async fn fetch(&self, id: Uuid) -> Result<Item> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM item WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::map_row)
            .ok_or(Error::ItemNotFound(id))
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM item ORDER BY created_at_utc DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    async fn update(&self, id: Uuid, req: UpdateItemRequest) -> Result<Item> {
        let req = req.validate()?;
        let now = Utc::now();

        // Build dynamic update query
        let mut updates = vec!["updated_at_utc = $1".to_string()];
        let mut param_count = 2;

        for (column, present) in [
            ("name", req.name.is_some()),
            ("year", req.year.is_some()),
            ("price", req.price.is_some()),
            ("tag", req.tag.is_some()),
            ("note", req.note.is_some()),
            ("image", req.image.is_some()),
        ] {
            if present {
                updates.push(format!("{} = ${}", column, param_count));
                param_count += 1;
            }
        }

        let query = format!(
            "UPDATE item SET {} WHERE id = ${} RETURNING {}",
            updates.join(", "),
            param_count,
            ITEM_COLUMNS
        );

        let mut q = sqlx::query(&query).bind(now);

        if let Some(name) = &req.name {
            q = q.bind(name);
        }
        if let Some(year) = req.year {
            q = q.bind(year);
        }
        if let Some(price) = req.price {
            q = q.bind(price);
        }
        if let Some(tag) = &req.tag {
            q = q.bind(tag.as_deref());
        }
        if let Some(note) = &req.note {
            q = q.bind(note.as_deref());
        }
        if let Some(image) = &req.image {
            q = q.bind(image.as_deref());
        }

        let row = q
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::map_row)
            .ok_or(Error::ItemNotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ItemNotFound(id));
        }

        debug!(item_id = %id, "item: delete");
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM item WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
