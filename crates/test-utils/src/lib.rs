//! Vitrine test utilities.
//!
//! Builders for seed documents used by integration tests, plus JSON
//! assertion helpers. Seeds are produced as `serde_json::Value` in the same
//! shape as the YAML seed files, so the kernel can load them through its
//! regular seed parser.

use serde_json::{Value as JsonValue, json};

/// First id handed out to items added without an explicit id.
const FIRST_ITEM_ID: i64 = 1000;

/// Term ids of the standard fixture.
pub mod terms {
    pub const DESIGN: i64 = 10;
    pub const DEVELOPMENT: i64 = 11;
    pub const NEWS: i64 = 12;
    pub const RUST: i64 = 20;
    pub const TYPOGRAPHY: i64 = 21;
    pub const BRANDING: i64 = 30;
    pub const WEB: i64 = 31;
    pub const PRINT: i64 = 32;
    pub const ILLUSTRATION: i64 = 40;
    pub const FRONT_END: i64 = 41;
    pub const PHOTOGRAPHY: i64 = 42;
    pub const PRINTS: i64 = 50;
    pub const TEMPLATES: i64 = 51;
    pub const BESTSELLER: i64 = 60;
}

/// Author ids of the standard fixture.
pub mod authors {
    pub const ADA: i64 = 1;
    pub const GRACE: i64 = 2;
}

/// Create a test item with default values.
pub fn test_item(item_type: &str, title: &str) -> TestItem {
    TestItem {
        id: None,
        item_type: item_type.to_string(),
        title: title.to_string(),
        slug: None,
        content: format!("<p>{title}</p>"),
        excerpt: None,
        status: "publish".to_string(),
        author: None,
        date: "2024-01-01 00:00:00".to_string(),
        modified: None,
        menu_order: 0,
        terms: Vec::new(),
        fields: json!({}),
    }
}

/// A test item builder for creating seed items.
#[derive(Debug, Clone)]
pub struct TestItem {
    pub id: Option<i64>,
    pub item_type: String,
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: String,
    pub author: Option<i64>,
    pub date: String,
    pub modified: Option<String>,
    pub menu_order: i32,
    pub terms: Vec<i64>,
    pub fields: JsonValue,
}

impl TestItem {
    /// Set a custom ID.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: i64) -> Self {
        self.author = Some(author);
        self
    }

    /// Set the publish date (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`).
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    /// Set the last-modified date.
    pub fn with_modified(mut self, date: &str) -> Self {
        self.modified = Some(date.to_string());
        self
    }

    /// Attach terms.
    pub fn with_terms(mut self, terms: &[i64]) -> Self {
        self.terms.extend_from_slice(terms);
        self
    }

    /// Set body HTML.
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Set a hand-written excerpt.
    pub fn with_excerpt(mut self, excerpt: &str) -> Self {
        self.excerpt = Some(excerpt.to_string());
        self
    }

    /// Set the manual ordering weight.
    pub fn with_menu_order(mut self, order: i32) -> Self {
        self.menu_order = order;
        self
    }

    /// Set as draft.
    pub fn unpublished(mut self) -> Self {
        self.status = "draft".to_string();
        self
    }

    /// Add a single field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.fields.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Set the featured image.
    pub fn with_image(self, url: &str, alt: &str) -> Self {
        self.with_field("featured_image", json!({ "url": url, "alt": alt }))
    }

    /// Set commerce prices. An empty sale price means not on sale.
    pub fn with_price(self, regular: &str, sale: &str) -> Self {
        let item = self.with_field("regular_price", json!(regular));
        if sale.is_empty() {
            item
        } else {
            item.with_field("sale_price", json!(sale))
        }
    }

    fn to_json(&self, id: i64) -> JsonValue {
        let slug = self.slug.clone().unwrap_or_else(|| slugify(&self.title));
        let mut value = json!({
            "id": id,
            "type": self.item_type,
            "title": self.title,
            "slug": slug,
            "content": self.content,
            "status": self.status,
            "date": self.date,
            "menu_order": self.menu_order,
            "terms": self.terms,
            "fields": self.fields,
        });
        if let Some(obj) = value.as_object_mut() {
            if let Some(author) = self.author {
                obj.insert("author".to_string(), json!(author));
            }
            if let Some(excerpt) = &self.excerpt {
                obj.insert("excerpt".to_string(), json!(excerpt));
            }
            if let Some(modified) = &self.modified {
                obj.insert("modified".to_string(), json!(modified));
            }
        }
        value
    }
}

/// Builds a complete seed document.
#[derive(Debug, Clone, Default)]
pub struct SeedBuilder {
    content_types: Vec<JsonValue>,
    taxonomies: Vec<JsonValue>,
    terms: Vec<JsonValue>,
    authors: Vec<JsonValue>,
    items: Vec<TestItem>,
}

impl SeedBuilder {
    /// An empty seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts, portfolio projects and products with their taxonomies, terms
    /// and two authors, but no items.
    pub fn standard() -> Self {
        Self::new()
            .with_taxonomy("category", "Categories", true, "category")
            .with_taxonomy("post_tag", "Tags", false, "tag")
            .with_taxonomy("portfolio_category", "Project Categories", true, "custom")
            .with_taxonomy("skills", "Skills", false, "custom")
            .with_taxonomy("product_cat", "Product Categories", true, "category")
            .with_taxonomy("product_tag", "Product Tags", false, "tag")
            .with_content_type("post", "Posts", &["category", "post_tag"])
            .with_content_type("portfolio", "Projects", &["portfolio_category", "skills"])
            .with_content_type("product", "Products", &["product_cat", "product_tag"])
            .with_term(terms::DESIGN, "category", "Design")
            .with_term(terms::DEVELOPMENT, "category", "Development")
            .with_term(terms::NEWS, "category", "News")
            .with_term(terms::RUST, "post_tag", "Rust")
            .with_term(terms::TYPOGRAPHY, "post_tag", "Typography")
            .with_term(terms::BRANDING, "portfolio_category", "Branding")
            .with_term(terms::WEB, "portfolio_category", "Web")
            .with_term(terms::PRINT, "portfolio_category", "Print")
            .with_term(terms::ILLUSTRATION, "skills", "Illustration")
            .with_term(terms::FRONT_END, "skills", "Front-end")
            .with_term(terms::PHOTOGRAPHY, "skills", "Photography")
            .with_term(terms::PRINTS, "product_cat", "Prints")
            .with_term(terms::TEMPLATES, "product_cat", "Templates")
            .with_term(terms::BESTSELLER, "product_tag", "Bestseller")
            .with_author(authors::ADA, "Ada Lovelace", "ada")
            .with_author(authors::GRACE, "Grace Hopper", "grace")
    }

    /// Register a public content type.
    pub fn with_content_type(mut self, name: &str, label: &str, taxonomies: &[&str]) -> Self {
        self.content_types.push(json!({
            "name": name,
            "label": label,
            "public": true,
            "taxonomies": taxonomies,
        }));
        self
    }

    /// Register a content type that is not publicly queryable.
    pub fn with_private_content_type(mut self, name: &str, label: &str) -> Self {
        self.content_types.push(json!({
            "name": name,
            "label": label,
            "public": false,
        }));
        self
    }

    /// Register a taxonomy. `role` is `category`, `tag` or `custom`.
    pub fn with_taxonomy(mut self, name: &str, label: &str, hierarchical: bool, role: &str) -> Self {
        self.taxonomies.push(json!({
            "name": name,
            "label": label,
            "hierarchical": hierarchical,
            "role": role,
        }));
        self
    }

    /// Add a term.
    pub fn with_term(mut self, id: i64, taxonomy: &str, name: &str) -> Self {
        self.terms.push(json!({
            "id": id,
            "taxonomy": taxonomy,
            "name": name,
            "slug": slugify(name),
        }));
        self
    }

    /// Add an author.
    pub fn with_author(mut self, id: i64, name: &str, slug: &str) -> Self {
        self.authors.push(json!({ "id": id, "name": name, "slug": slug }));
        self
    }

    /// Add an item.
    pub fn with_item(mut self, item: TestItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add `count` published posts titled "Post 1".."Post N", one day apart
    /// starting 2024-01-01, so date-descending order is "Post N" first.
    pub fn with_posts(mut self, count: usize) -> Self {
        for n in 1..=count {
            let day = (n - 1) % 28 + 1;
            let month = (n - 1) / 28 + 1;
            self.items.push(
                test_item("post", &format!("Post {n}"))
                    .with_date(&format!("2024-{month:02}-{day:02} 12:00:00"))
                    .with_author(authors::ADA),
            );
        }
        self
    }

    /// Number of items added so far.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Produce the seed document. Items without an explicit id are numbered
    /// from 1000 in insertion order.
    pub fn build(&self) -> JsonValue {
        let mut next_id = FIRST_ITEM_ID;
        let items: Vec<JsonValue> = self
            .items
            .iter()
            .map(|item| {
                let id = item.id.unwrap_or_else(|| {
                    let id = next_id;
                    next_id += 1;
                    id
                });
                item.to_json(id)
            })
            .collect();

        json!({
            "content_types": self.content_types,
            "taxonomies": self.taxonomies,
            "terms": self.terms,
            "authors": self.authors,
            "items": items,
        })
    }
}

/// Lowercase, hyphen-separated slug of a title.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Ids of the `items` array of a page response, in order.
    pub fn item_ids(page: &Value) -> Vec<i64> {
        page["items"]
            .as_array()
            .map(|items| items.iter().filter_map(|i| i["id"].as_i64()).collect())
            .unwrap_or_default()
    }

    /// Titles of the `items` array of a page response, in order.
    pub fn item_titles(page: &Value) -> Vec<String> {
        page["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Assert the paging envelope of a page response.
    pub fn page_meta(page: &Value, total: u64, pages: u64, current_page: u64) {
        assert_eq!(page["total"], total, "total mismatch in {page}");
        assert_eq!(page["pages"], pages, "pages mismatch in {page}");
        assert_eq!(page["current_page"], current_page, "current_page mismatch in {page}");
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}
