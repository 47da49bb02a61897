//! Seed documents.
//!
//! A seed is a YAML (or JSON) document describing a whole content
//! repository: content types, taxonomies, terms, authors and items. It backs
//! the in-memory repository and is the input of the `import` command.
//!
//! ```yaml
//! content_types:
//!   - { name: post, label: Posts, taxonomies: [category, post_tag] }
//! taxonomies:
//!   - { name: category, label: Categories, hierarchical: true, role: category }
//! terms:
//!   - { id: 10, taxonomy: category, name: Design, slug: design }
//! authors:
//!   - { id: 1, name: Ada, slug: ada }
//! items:
//!   - id: 100
//!     type: post
//!     title: Hello
//!     slug: hello
//!     author: 1
//!     date: 2024-03-01
//!     terms: [10]
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Author, ContentType, Item, STATUS_PUBLISH, Taxonomy, Term};

/// A complete seed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub content_types: Vec<ContentType>,
    #[serde(default)]
    pub taxonomies: Vec<Taxonomy>,
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

/// An item as written in a seed, with human-readable dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub author: Option<i64>,
    /// Publication date (`YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339).
    pub date: String,
    /// Last modification; defaults to `date`.
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub menu_order: i32,
    #[serde(default)]
    pub fields: serde_json::Value,
    #[serde(default)]
    pub terms: Vec<i64>,
}

fn default_status() -> String {
    STATUS_PUBLISH.to_string()
}

impl Seed {
    /// Read and validate a seed file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("invalid seed file {}", path.display()))
    }

    /// Parse and validate a YAML seed document.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let seed: Seed = serde_yml::from_str(raw).context("failed to parse seed YAML")?;
        seed.validate()?;
        Ok(seed)
    }

    /// Build a seed from an already-parsed JSON document.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let seed: Seed = serde_json::from_value(value).context("failed to parse seed JSON")?;
        seed.validate()?;
        Ok(seed)
    }

    /// Check cross references between the seed sections.
    pub fn validate(&self) -> Result<()> {
        let taxonomies: HashSet<&str> = self.taxonomies.iter().map(|t| t.name.as_str()).collect();
        let types: HashSet<&str> = self.content_types.iter().map(|t| t.name.as_str()).collect();
        let authors: HashSet<i64> = self.authors.iter().map(|a| a.id).collect();

        for ct in &self.content_types {
            for tax in &ct.taxonomies {
                if !taxonomies.contains(tax.as_str()) {
                    bail!("content type '{}' references unknown taxonomy '{tax}'", ct.name);
                }
            }
        }

        let mut term_ids = HashSet::new();
        for term in &self.terms {
            if !taxonomies.contains(term.taxonomy.as_str()) {
                bail!("term {} references unknown taxonomy '{}'", term.id, term.taxonomy);
            }
            if !term_ids.insert(term.id) {
                bail!("duplicate term id {}", term.id);
            }
        }

        let mut item_ids = HashSet::new();
        for item in &self.items {
            if !item_ids.insert(item.id) {
                bail!("duplicate item id {}", item.id);
            }
            if !types.contains(item.item_type.as_str()) {
                bail!("item {} has unknown content type '{}'", item.id, item.item_type);
            }
            if let Some(author) = item.author
                && !authors.contains(&author)
            {
                bail!("item {} references unknown author {author}", item.id);
            }
            if let Some(missing) = item.terms.iter().find(|id| !term_ids.contains(*id)) {
                bail!("item {} references unknown term {missing}", item.id);
            }
        }

        Ok(())
    }

    /// Convert the seed items into stored items.
    pub fn stored_items(&self) -> Result<Vec<Item>> {
        self.items.iter().map(SeedItem::to_item).collect()
    }
}

impl SeedItem {
    /// Convert to a stored item, parsing the date strings.
    pub fn to_item(&self) -> Result<Item> {
        let created = parse_timestamp(&self.date)
            .with_context(|| format!("item {} has an invalid date", self.id))?;
        let changed = match &self.modified {
            Some(modified) => parse_timestamp(modified)
                .with_context(|| format!("item {} has an invalid modified date", self.id))?,
            None => created,
        };

        let fields = if self.fields.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            self.fields.clone()
        };

        Ok(Item {
            id: self.id,
            item_type: self.item_type.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            status: self.status.clone(),
            author_id: self.author,
            created,
            changed,
            menu_order: self.menu_order,
            fields,
            term_ids: self.terms.clone(),
        })
    }
}

/// Parse a seed date into a unix timestamp (UTC).
pub fn parse_timestamp(value: &str) -> Result<i64> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc().timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(dt.and_utc().timestamp());
    }

    bail!("unrecognized date '{value}'")
}
