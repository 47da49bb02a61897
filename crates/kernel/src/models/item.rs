//! Item model.
//!
//! Items are the content records the portfolio lists. Type-specific data
//! (featured image, prices) lives in the JSONB `fields` column.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Status of items visible to the resolver.
pub const STATUS_PUBLISH: &str = "publish";

/// Item record (content record).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: i64,

    /// Content type machine name.
    #[serde(rename = "type")]
    pub item_type: String,

    pub title: String,

    pub slug: String,

    /// Hand-written excerpt; generated from `content` when absent.
    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub content: String,

    /// Publication status ("publish", "draft", "private", ...).
    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub author_id: Option<i64>,

    /// Unix timestamp of publication.
    pub created: i64,

    /// Unix timestamp of last modification.
    pub changed: i64,

    /// Manual ordering weight.
    #[serde(default)]
    pub menu_order: i32,

    /// Dynamic field storage (JSONB).
    #[serde(default = "empty_fields")]
    pub fields: serde_json::Value,

    /// Attached term ids.
    #[serde(default)]
    pub term_ids: Vec<i64>,
}

fn default_status() -> String {
    STATUS_PUBLISH.to_string()
}

fn empty_fields() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Item {
    /// Check if this item is published.
    pub fn is_published(&self) -> bool {
        self.status == STATUS_PUBLISH
    }

    /// Get a field value as a specific type.
    pub fn get_field<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Option<T> {
        self.fields
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Read a numeric field stored either as a JSON number or a numeric string.
    ///
    /// Empty strings count as unset, matching how shop data exports blank prices.
    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Insert or update an item and replace its term assignments.
    pub async fn upsert(pool: &PgPool, item: &Item) -> Result<()> {
        let mut tx = pool.begin().await.context("failed to begin transaction")?;

        sqlx::query(
            r#"
            INSERT INTO item (id, type, title, slug, excerpt, content, status, author_id, created, changed, menu_order, fields)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                type = EXCLUDED.type,
                title = EXCLUDED.title,
                slug = EXCLUDED.slug,
                excerpt = EXCLUDED.excerpt,
                content = EXCLUDED.content,
                status = EXCLUDED.status,
                author_id = EXCLUDED.author_id,
                created = EXCLUDED.created,
                changed = EXCLUDED.changed,
                menu_order = EXCLUDED.menu_order,
                fields = EXCLUDED.fields
            "#,
        )
        .bind(item.id)
        .bind(&item.item_type)
        .bind(&item.title)
        .bind(&item.slug)
        .bind(&item.excerpt)
        .bind(&item.content)
        .bind(&item.status)
        .bind(item.author_id)
        .bind(item.created)
        .bind(item.changed)
        .bind(item.menu_order)
        .bind(&item.fields)
        .execute(&mut *tx)
        .await
        .context("failed to upsert item")?;

        sqlx::query("DELETE FROM item_term WHERE item_id = $1")
            .bind(item.id)
            .execute(&mut *tx)
            .await
            .context("failed to clear item terms")?;

        for term_id in &item.term_ids {
            sqlx::query("INSERT INTO item_term (item_id, term_id) VALUES ($1, $2)")
                .bind(item.id)
                .bind(term_id)
                .execute(&mut *tx)
                .await
                .context("failed to attach term to item")?;
        }

        tx.commit().await.context("failed to commit item upsert")?;
        Ok(())
    }
}
