//! Taxonomy and term models.
//!
//! Taxonomies are named classification schemes. Their role decides which
//! request parameter filters them:
//! - `category`: matched by the `categories` parameter (e.g. "category", "product_cat")
//! - `tag`: matched by the `tags` parameter (e.g. "post_tag", "product_tag")
//! - `custom`: matched through the `taxonomies` JSON parameter

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// How a taxonomy participates in filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyRole {
    Category,
    Tag,
    #[default]
    Custom,
}

impl TaxonomyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Custom => "custom",
        }
    }

    fn from_db(value: &str) -> Self {
        match value {
            "category" => Self::Category,
            "tag" => Self::Tag,
            _ => Self::Custom,
        }
    }
}

/// A taxonomy definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxonomy {
    /// Machine name (e.g. "portfolio_category").
    pub name: String,

    /// Human-readable label.
    pub label: String,

    /// Hierarchical ("category-like") or flat ("tag-like").
    #[serde(default)]
    pub hierarchical: bool,

    #[serde(default)]
    pub role: TaxonomyRole,
}

/// A term within a taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Term {
    pub id: i64,
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct TaxonomyRow {
    name: String,
    label: String,
    hierarchical: bool,
    role: String,
}

impl From<TaxonomyRow> for Taxonomy {
    fn from(row: TaxonomyRow) -> Self {
        Self {
            name: row.name,
            label: row.label,
            hierarchical: row.hierarchical,
            role: TaxonomyRole::from_db(&row.role),
        }
    }
}

impl Taxonomy {
    /// List all taxonomies.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, TaxonomyRow>(
            "SELECT name, label, hierarchical, role FROM taxonomy ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .context("failed to list taxonomies")?;

        Ok(rows.into_iter().map(Taxonomy::from).collect())
    }

    /// Insert or update a taxonomy.
    pub async fn upsert(pool: &PgPool, taxonomy: &Taxonomy) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO taxonomy (name, label, hierarchical, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE SET
                label = EXCLUDED.label,
                hierarchical = EXCLUDED.hierarchical,
                role = EXCLUDED.role
            "#,
        )
        .bind(&taxonomy.name)
        .bind(&taxonomy.label)
        .bind(taxonomy.hierarchical)
        .bind(taxonomy.role.as_str())
        .execute(pool)
        .await
        .context("failed to upsert taxonomy")?;

        Ok(())
    }
}

impl Term {
    /// Fetch terms by id. Unknown ids are simply absent from the result.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let terms = sqlx::query_as::<_, Self>(
            "SELECT id, taxonomy, name, slug, parent FROM term WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch terms")?;

        Ok(terms)
    }

    /// Insert or update a term.
    pub async fn upsert(pool: &PgPool, term: &Term) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO term (id, taxonomy, name, slug, parent)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                taxonomy = EXCLUDED.taxonomy,
                name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                parent = EXCLUDED.parent
            "#,
        )
        .bind(term.id)
        .bind(&term.taxonomy)
        .bind(&term.name)
        .bind(&term.slug)
        .bind(term.parent)
        .execute(pool)
        .await
        .context("failed to upsert term")?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn role_serialization() {
        let json = serde_json::to_string(&TaxonomyRole::Category).unwrap();
        assert_eq!(json, "\"category\"");

        let parsed: Taxonomy =
            serde_json::from_str(r#"{"name": "skills", "label": "Skills"}"#).unwrap();
        assert_eq!(parsed.role, TaxonomyRole::Custom);
        assert!(!parsed.hierarchical);
    }

    #[test]
    fn role_from_db_defaults_to_custom() {
        assert_eq!(TaxonomyRole::from_db("tag"), TaxonomyRole::Tag);
        assert_eq!(TaxonomyRole::from_db("other"), TaxonomyRole::Custom);
    }
}
