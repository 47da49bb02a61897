//! Response types for the portfolio API.
//!
//! Items, filter catalogs and content-type options are returned as JSON by
//! the kernel. Field names follow the public REST contract
//! (`current_page`, `per_page`, `post_type`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sort key accepted by the `orderby` parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Publish date.
    #[default]
    Date,
    /// Title, case-insensitive.
    Title,
    /// Last-modified date.
    Modified,
    /// Manual ordering weight.
    MenuOrder,
    /// Random order (not stable across pages).
    Rand,
}

impl SortKey {
    /// Parse a request parameter. Unknown values yield `None`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            "modified" => Some(Self::Modified),
            "menu_order" => Some(Self::MenuOrder),
            "rand" => Some(Self::Rand),
            _ => None,
        }
    }

    /// The parameter spelling of this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Modified => "modified",
            Self::MenuOrder => "menu_order",
            Self::Rand => "rand",
        }
    }
}

/// Sort direction accepted by the `order` parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a request parameter, ignoring case. Unknown values yield `None`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Featured image attached to an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// A taxonomy term as attached to an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub taxonomy: String,
}

/// Author summary embedded in an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: i64,
    pub name: String,
    /// Author archive link.
    pub url: String,
}

/// Price data for commerce items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceInfo {
    /// Effective price (sale price when on sale), formatted as a decimal.
    pub price: String,
    pub regular_price: Option<String>,
    pub sale_price: Option<String>,
    pub on_sale: bool,
    /// Ready-to-render price markup.
    pub price_html: String,
}

/// A normalized content record returned by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    pub id: i64,
    pub title: String,
    /// Sanitized HTML excerpt.
    pub excerpt: String,
    pub content: String,
    /// Canonical link.
    pub link: String,
    /// Publish date (RFC 3339).
    pub date: String,
    /// Last-modified date (RFC 3339).
    pub modified: String,
    pub post_type: String,
    pub post_type_label: String,
    pub featured_image: Option<ImageRef>,
    #[serde(default)]
    pub categories: Vec<TermRef>,
    #[serde(default)]
    pub tags: Vec<TermRef>,
    /// Every attached term grouped by taxonomy name.
    #[serde(default)]
    pub taxonomies: BTreeMap<String, Vec<TermRef>>,
    pub author: Option<AuthorRef>,
    pub price: Option<PriceInfo>,
}

/// One page of resolver results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioPage {
    pub items: Vec<ItemRecord>,
    /// Count of all matching items, independent of paging.
    pub total: u64,
    /// `ceil(total / per_page)`.
    pub pages: u32,
    pub current_page: u32,
    pub per_page: u32,
}

impl PortfolioPage {
    /// Create a page, deriving the page count from `total` and `per_page`.
    pub fn new(items: Vec<ItemRecord>, total: u64, current_page: u32, per_page: u32) -> Self {
        Self {
            items,
            total,
            pages: page_count(total, per_page),
            current_page,
            per_page,
        }
    }

    /// An empty, well-formed result.
    pub fn empty(current_page: u32, per_page: u32) -> Self {
        Self::new(Vec::new(), 0, current_page, per_page)
    }

    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.pages
    }
}

/// Number of pages needed to show `total` items, `per_page` at a time.
pub fn page_count(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// A selectable filter value with its occurrence count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub count: u64,
}

/// Available terms for one custom taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyCatalog {
    pub label: String,
    #[serde(default)]
    pub hierarchical: bool,
    pub terms: Vec<CatalogEntry>,
}

/// Available filter values for a content-type selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterCatalog {
    pub categories: Vec<CatalogEntry>,
    pub tags: Vec<CatalogEntry>,
    pub taxonomies: BTreeMap<String, TaxonomyCatalog>,
    pub authors: Vec<CatalogEntry>,
}

impl FilterCatalog {
    /// Whether the catalog offers nothing to filter on.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.tags.is_empty()
            && self.taxonomies.values().all(|t| t.terms.is_empty())
            && self.authors.is_empty()
    }
}

/// A content type offered for selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentTypeOption {
    pub value: String,
    pub label: String,
}

/// JSON error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(25, 12), 3);
        assert_eq!(page_count(24, 12), 2);
        assert_eq!(page_count(1, 12), 1);
        assert_eq!(page_count(0, 12), 0);
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn portfolio_page_paging() {
        let page = PortfolioPage::new(vec![], 25, 2, 12);
        assert_eq!(page.pages, 3);
        assert!(page.has_next());

        let last = PortfolioPage::new(vec![], 25, 3, 12);
        assert!(!last.has_next());
    }

    #[test]
    fn empty_page_has_no_pages() {
        let page = PortfolioPage::empty(1, 12);
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn sort_key_params() {
        assert_eq!(SortKey::from_param("menu_order"), Some(SortKey::MenuOrder));
        assert_eq!(SortKey::from_param(" Title "), Some(SortKey::Title));
        assert_eq!(SortKey::from_param("price"), None);
        assert_eq!(SortKey::Rand.as_str(), "rand");
    }

    #[test]
    fn sort_order_params() {
        assert_eq!(SortOrder::from_param("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::from_param("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::from_param("up"), None);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn sort_order_serializes_uppercase() {
        let json = serde_json::to_string(&SortOrder::Asc).unwrap();
        assert_eq!(json, "\"ASC\"");
    }

    #[test]
    fn catalog_emptiness() {
        let mut catalog = FilterCatalog::default();
        assert!(catalog.is_empty());

        catalog.taxonomies.insert(
            "portfolio_category".to_string(),
            TaxonomyCatalog {
                label: "Project Categories".to_string(),
                hierarchical: true,
                terms: vec![],
            },
        );
        assert!(catalog.is_empty());

        catalog.authors.push(CatalogEntry {
            id: 1,
            name: "Ada".to_string(),
            slug: "ada".to_string(),
            count: 3,
        });
        assert!(!catalog.is_empty());
    }
}
