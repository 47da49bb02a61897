//! PostgreSQL content repository.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::query_builder::ItemQueryBuilder;
use super::{AuthorCount, ContentRepository, ItemPage, ItemQuery, TermCount};
use crate::db;
use crate::models::{Author, ContentType, Item, STATUS_PUBLISH, Taxonomy, Term};

/// Repository reading from the PostgreSQL schema in `migrations/`.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

/// One row of the item page query, in [`ItemQueryBuilder`] column order.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    #[sqlx(rename = "type")]
    item_type: String,
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    status: String,
    author_id: Option<i64>,
    created: i64,
    changed: i64,
    menu_order: i32,
    fields: serde_json::Value,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            item_type: row.item_type,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            status: row.status,
            author_id: row.author_id,
            created: row.created,
            changed: row.changed,
            menu_order: row.menu_order,
            fields: row.fields,
            term_ids: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TermCountRow {
    id: i64,
    taxonomy: String,
    name: String,
    slug: String,
    parent: Option<i64>,
    count: i64,
}

#[derive(sqlx::FromRow)]
struct AuthorCountRow {
    id: i64,
    name: String,
    slug: String,
    count: i64,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Attach term ids to a page of items.
    async fn load_term_ids(&self, items: &mut [Item]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let pairs: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT item_id, term_id FROM item_term WHERE item_id = ANY($1) ORDER BY term_id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .context("failed to load item terms")?;

        let mut by_item: HashMap<i64, Vec<i64>> = HashMap::new();
        for (item_id, term_id) in pairs {
            by_item.entry(item_id).or_default().push(term_id);
        }
        for item in items {
            item.term_ids = by_item.remove(&item.id).unwrap_or_default();
        }
        Ok(())
    }
}

impl std::fmt::Debug for PgRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRepository")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

#[async_trait]
impl ContentRepository for PgRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn content_types(&self) -> Result<Vec<ContentType>> {
        ContentType::list(&self.pool).await
    }

    async fn taxonomies(&self) -> Result<Vec<Taxonomy>> {
        Taxonomy::list(&self.pool).await
    }

    async fn terms_by_ids(&self, ids: &[i64]) -> Result<Vec<Term>> {
        Term::find_by_ids(&self.pool, ids).await
    }

    async fn authors_by_ids(&self, ids: &[i64]) -> Result<Vec<Author>> {
        Author::find_by_ids(&self.pool, ids).await
    }

    async fn query_items(&self, query: &ItemQuery) -> Result<ItemPage> {
        let builder = ItemQueryBuilder::new(query);

        // SET LOCAL only lasts for the transaction.
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        sqlx::query("SET LOCAL statement_timeout = '10s'")
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        let count_sql = builder.build_count();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&mut *tx)
            .await
            .context("failed to execute count query")?;

        // Rows arrive in the builder's ORDER BY; keep them in that order.
        let main_sql = builder.build();
        let rows: Vec<ItemRow> = sqlx::query_as(&main_sql)
            .fetch_all(&mut *tx)
            .await
            .context("failed to execute item query")?;

        tx.commit()
            .await
            .context("failed to commit query transaction")?;

        let mut items: Vec<Item> = rows.into_iter().map(Item::from).collect();
        self.load_term_ids(&mut items).await?;

        Ok(ItemPage {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn term_counts(
        &self,
        types: &[String],
        taxonomies: &[String],
        exclude_ids: &[i64],
    ) -> Result<Vec<TermCount>> {
        if types.is_empty() || taxonomies.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TermCountRow>(
            r#"
            SELECT t.id, t.taxonomy, t.name, t.slug, t.parent, COUNT(DISTINCT i.id) AS count
            FROM term t
            INNER JOIN item_term it ON it.term_id = t.id
            INNER JOIN item i ON i.id = it.item_id
            WHERE i.status = $1 AND i.type = ANY($2) AND t.taxonomy = ANY($3)
              AND NOT (i.id = ANY($4))
            GROUP BY t.id, t.taxonomy, t.name, t.slug, t.parent
            ORDER BY t.name, t.id
            "#,
        )
        .bind(STATUS_PUBLISH)
        .bind(types)
        .bind(taxonomies)
        .bind(exclude_ids)
        .fetch_all(&self.pool)
        .await
        .context("failed to count terms")?;

        Ok(rows
            .into_iter()
            .map(|row| TermCount {
                term: Term {
                    id: row.id,
                    taxonomy: row.taxonomy,
                    name: row.name,
                    slug: row.slug,
                    parent: row.parent,
                },
                count: u64::try_from(row.count).unwrap_or(0),
            })
            .collect())
    }

    async fn author_counts(
        &self,
        types: &[String],
        exclude_ids: &[i64],
    ) -> Result<Vec<AuthorCount>> {
        if types.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AuthorCountRow>(
            r#"
            SELECT a.id, a.name, a.slug, COUNT(i.id) AS count
            FROM author a
            INNER JOIN item i ON i.author_id = a.id
            WHERE i.status = $1 AND i.type = ANY($2) AND NOT (i.id = ANY($3))
            GROUP BY a.id, a.name, a.slug
            ORDER BY a.name, a.id
            "#,
        )
        .bind(STATUS_PUBLISH)
        .bind(types)
        .bind(exclude_ids)
        .fetch_all(&self.pool)
        .await
        .context("failed to count authors")?;

        Ok(rows
            .into_iter()
            .map(|row| AuthorCount {
                author: Author {
                    id: row.id,
                    name: row.name,
                    slug: row.slug,
                },
                count: u64::try_from(row.count).unwrap_or(0),
            })
            .collect())
    }

    async fn health(&self) -> bool {
        db::check_health(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn item_rows_map_every_column() {
        let row = ItemRow {
            id: 7,
            item_type: "portfolio".to_string(),
            title: "Alpha".to_string(),
            slug: "alpha".to_string(),
            excerpt: None,
            content: "<p>Body</p>".to_string(),
            status: STATUS_PUBLISH.to_string(),
            author_id: Some(2),
            created: 100,
            changed: 200,
            menu_order: 3,
            fields: json!({"price": "10"}),
        };

        let item = Item::from(row);
        assert_eq!(item.id, 7);
        assert_eq!(item.item_type, "portfolio");
        assert_eq!(item.author_id, Some(2));
        assert_eq!((item.created, item.changed, item.menu_order), (100, 200, 3));
        assert_eq!(item.get_number("price"), Some(10.0));
        assert!(item.is_published());
        assert!(item.term_ids.is_empty());
    }
}
