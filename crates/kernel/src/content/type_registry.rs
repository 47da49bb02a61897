//! Content type registry.
//!
//! Holds the content types and taxonomies known to the repository, loaded
//! once at startup and cached in memory for fast access. The resolver uses
//! it to whitelist requested types and to find which taxonomies a selection
//! of types carries.

use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::models::{ATTACHMENT_TYPE, ContentType, Taxonomy};
use crate::repository::ContentRepository;

/// Registry of content types and taxonomies.
#[derive(Clone)]
pub struct ContentTypeRegistry {
    inner: Arc<ContentTypeRegistryInner>,
}

struct ContentTypeRegistryInner {
    types: DashMap<String, ContentType>,
    taxonomies: DashMap<String, Taxonomy>,
    commerce_type: String,
}

impl ContentTypeRegistry {
    /// Create a registry from already-loaded definitions.
    pub fn new(
        types: Vec<ContentType>,
        taxonomies: Vec<Taxonomy>,
        commerce_type: impl Into<String>,
    ) -> Self {
        let registry = Self {
            inner: Arc::new(ContentTypeRegistryInner {
                types: DashMap::new(),
                taxonomies: DashMap::new(),
                commerce_type: commerce_type.into(),
            }),
        };
        for ct in types {
            registry.inner.types.insert(ct.name.clone(), ct);
        }
        for tax in taxonomies {
            registry.inner.taxonomies.insert(tax.name.clone(), tax);
        }
        registry
    }

    /// Load content types and taxonomies from the repository.
    pub async fn load(repo: &dyn ContentRepository, commerce_type: &str) -> Result<Self> {
        let types = repo.content_types().await?;
        let taxonomies = repo.taxonomies().await?;

        info!(
            content_types = types.len(),
            taxonomies = taxonomies.len(),
            "content type registry loaded"
        );

        Ok(Self::new(types, taxonomies, commerce_type))
    }

    /// Get a content type by machine name.
    pub fn get(&self, type_name: &str) -> Option<ContentType> {
        self.inner.types.get(type_name).map(|r| r.clone())
    }

    /// Get a taxonomy by machine name.
    pub fn taxonomy(&self, name: &str) -> Option<Taxonomy> {
        self.inner.taxonomies.get(name).map(|r| r.clone())
    }

    /// List all content types, ordered by name.
    pub fn list(&self) -> Vec<ContentType> {
        let mut types: Vec<ContentType> =
            self.inner.types.iter().map(|r| r.value().clone()).collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// Machine name of the commerce content type.
    pub fn commerce_type(&self) -> &str {
        &self.inner.commerce_type
    }

    /// Whether items of `type_name` carry prices.
    pub fn is_commerce(&self, type_name: &str) -> bool {
        type_name == self.inner.commerce_type
    }

    /// Whether a type may be queried by anonymous visitors.
    pub fn is_queryable(&self, type_name: &str) -> bool {
        type_name != ATTACHMENT_TYPE && self.get(type_name).is_some_and(|ct| ct.public)
    }

    /// Reduce a requested type list to the queryable types it names.
    ///
    /// Unknown, private and duplicate entries are dropped without error. When
    /// `include_commerce` is set, the commerce type is appended if it is
    /// registered and public.
    pub fn resolve_selection(&self, requested: &[String], include_commerce: bool) -> Vec<String> {
        let mut selected: Vec<String> = Vec::with_capacity(requested.len() + 1);

        for name in requested {
            if selected.contains(name) {
                continue;
            }
            if self.is_queryable(name) {
                selected.push(name.clone());
            } else {
                debug!(content_type = %name, "dropping unknown or non-public content type");
            }
        }

        if include_commerce {
            let commerce = self.commerce_type().to_string();
            if !selected.contains(&commerce) && self.is_queryable(&commerce) {
                selected.push(commerce);
            }
        }

        selected
    }

    /// Public types that may be offered for selection.
    pub fn discoverable(&self) -> Vec<ContentType> {
        self.list()
            .into_iter()
            .filter(|ct| ct.public && ct.name != ATTACHMENT_TYPE)
            .collect()
    }

    /// Taxonomies attached to any of the given types, without duplicates.
    ///
    /// Taxonomies referenced by a type but never registered are skipped.
    pub fn taxonomies_for(&self, types: &[String]) -> Vec<Taxonomy> {
        let mut found: Vec<Taxonomy> = Vec::new();
        for type_name in types {
            let Some(ct) = self.get(type_name) else {
                continue;
            };
            for tax_name in &ct.taxonomies {
                if found.iter().any(|t| &t.name == tax_name) {
                    continue;
                }
                if let Some(tax) = self.taxonomy(tax_name) {
                    found.push(tax);
                }
            }
        }
        found
    }

    /// Get the number of registered content types.
    pub fn len(&self) -> usize {
        self.inner.types.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.types.is_empty()
    }
}

impl std::fmt::Debug for ContentTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTypeRegistry")
            .field("types", &self.inner.types.len())
            .field("taxonomies", &self.inner.taxonomies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaxonomyRole;

    fn ct(name: &str, public: bool, taxonomies: &[&str]) -> ContentType {
        ContentType {
            name: name.to_string(),
            label: name.to_uppercase(),
            public,
            taxonomies: taxonomies.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn tax(name: &str, role: TaxonomyRole) -> Taxonomy {
        Taxonomy {
            name: name.to_string(),
            label: name.to_string(),
            hierarchical: role == TaxonomyRole::Category,
            role,
        }
    }

    fn registry() -> ContentTypeRegistry {
        ContentTypeRegistry::new(
            vec![
                ct("post", true, &["category", "post_tag"]),
                ct("portfolio", true, &["portfolio_category"]),
                ct("product", true, &["product_cat"]),
                ct("secret", false, &[]),
                ct("attachment", true, &[]),
            ],
            vec![
                tax("category", TaxonomyRole::Category),
                tax("post_tag", TaxonomyRole::Tag),
                tax("portfolio_category", TaxonomyRole::Custom),
                tax("product_cat", TaxonomyRole::Category),
            ],
            "product",
        )
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn selection_drops_unknown_private_and_duplicates() {
        let reg = registry();
        let selected = reg.resolve_selection(
            &names(&["post", "doesnotexist", "secret", "post", "attachment"]),
            false,
        );
        assert_eq!(selected, names(&["post"]));
    }

    #[test]
    fn selection_of_nothing_valid_is_empty() {
        let reg = registry();
        assert!(reg.resolve_selection(&names(&["doesnotexist"]), false).is_empty());
    }

    #[test]
    fn include_commerce_appends_product_once() {
        let reg = registry();
        assert_eq!(
            reg.resolve_selection(&names(&["portfolio"]), true),
            names(&["portfolio", "product"])
        );
        assert_eq!(
            reg.resolve_selection(&names(&["product"]), true),
            names(&["product"])
        );
    }

    #[test]
    fn discoverable_excludes_attachment_and_private() {
        let reg = registry();
        let found: Vec<String> = reg.discoverable().into_iter().map(|ct| ct.name).collect();
        assert_eq!(found, names(&["portfolio", "post", "product"]));
    }

    #[test]
    fn taxonomies_for_selection_are_deduplicated() {
        let reg = registry();
        let found: Vec<String> = reg
            .taxonomies_for(&names(&["post", "product", "post"]))
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(found, names(&["category", "post_tag", "product_cat"]));
    }
}
