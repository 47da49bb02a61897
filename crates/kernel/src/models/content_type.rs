//! Content type model.
//!
//! A content type is a queryable kind of record (post, portfolio project,
//! product). Each type lists the taxonomies whose terms may be attached to
//! its items.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Content type that is never offered for selection.
pub const ATTACHMENT_TYPE: &str = "attachment";

/// A registered content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ContentType {
    /// Machine name (e.g. "post", "portfolio").
    pub name: String,

    /// Human-readable plural label.
    pub label: String,

    /// Whether items of this type are publicly queryable.
    #[serde(default = "default_public")]
    pub public: bool,

    /// Taxonomies attached to this type.
    #[serde(default)]
    pub taxonomies: Vec<String>,
}

fn default_public() -> bool {
    true
}

impl ContentType {
    /// Whether a taxonomy is attached to this type.
    pub fn has_taxonomy(&self, taxonomy: &str) -> bool {
        self.taxonomies.iter().any(|t| t == taxonomy)
    }

    /// List all content types.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let types = sqlx::query_as::<_, Self>(
            "SELECT name, label, public, taxonomies FROM content_type ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .context("failed to list content types")?;

        Ok(types)
    }

    /// Insert or update a content type.
    pub async fn upsert(pool: &PgPool, content_type: &ContentType) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO content_type (name, label, public, taxonomies)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE SET
                label = EXCLUDED.label,
                public = EXCLUDED.public,
                taxonomies = EXCLUDED.taxonomies
            "#,
        )
        .bind(&content_type.name)
        .bind(&content_type.label)
        .bind(content_type.public)
        .bind(&content_type.taxonomies)
        .execute(pool)
        .await
        .context("failed to upsert content type")?;

        Ok(())
    }
}
