//! Author model.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// An item author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    /// Display name.
    pub name: String,
    pub slug: String,
}

impl Author {
    /// Fetch authors by id.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let authors =
            sqlx::query_as::<_, Self>("SELECT id, name, slug FROM author WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(pool)
                .await
                .context("failed to fetch authors")?;

        Ok(authors)
    }

    /// Insert or update an author.
    pub async fn upsert(pool: &PgPool, author: &Author) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO author (id, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, slug = EXCLUDED.slug
            "#,
        )
        .bind(author.id)
        .bind(&author.name)
        .bind(&author.slug)
        .execute(pool)
        .await
        .context("failed to upsert author")?;

        Ok(())
    }
}
