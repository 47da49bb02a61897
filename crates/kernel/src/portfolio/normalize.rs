//! Conversion of stored items into API item records.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat};
use vitrine_sdk::types::{AuthorRef, ImageRef, ItemRecord, TermRef};

use crate::content::{ContentTypeRegistry, PriceFormatter, text};
use crate::models::{Author, Item, TaxonomyRole, Term};
use crate::repository::ContentRepository;

/// Content type whose items live at the site root.
const ROOT_TYPE: &str = "post";

/// Builds [`ItemRecord`]s from stored items.
#[derive(Debug, Clone)]
pub struct ItemNormalizer {
    registry: ContentTypeRegistry,
    prices: PriceFormatter,
    site_url: String,
}

impl ItemNormalizer {
    pub fn new(registry: ContentTypeRegistry, prices: PriceFormatter, site_url: &str) -> Self {
        Self {
            registry,
            prices,
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Normalize a page of items, loading their terms and authors in one
    /// batch each.
    pub async fn normalize_all(
        &self,
        repo: &dyn ContentRepository,
        items: &[Item],
    ) -> Result<Vec<ItemRecord>> {
        let mut term_ids: Vec<i64> = items.iter().flat_map(|i| i.term_ids.iter().copied()).collect();
        term_ids.sort_unstable();
        term_ids.dedup();

        let mut author_ids: Vec<i64> = items.iter().filter_map(|i| i.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let terms: HashMap<i64, Term> = repo
            .terms_by_ids(&term_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let authors: HashMap<i64, Author> = repo
            .authors_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(items
            .iter()
            .map(|item| self.normalize(item, &terms, &authors))
            .collect())
    }

    /// Normalize one item given preloaded terms and authors.
    pub fn normalize(
        &self,
        item: &Item,
        terms: &HashMap<i64, Term>,
        authors: &HashMap<i64, Author>,
    ) -> ItemRecord {
        let content_type = self.registry.get(&item.item_type);
        let post_type_label = content_type
            .as_ref()
            .map_or_else(|| item.item_type.clone(), |ct| ct.label.clone());

        // Types without category/tag taxonomies surface their custom ones
        // instead: hierarchical as categories, flat as tags.
        let has_standard = content_type.as_ref().is_some_and(|ct| {
            ct.taxonomies.iter().any(|name| {
                self.registry
                    .taxonomy(name)
                    .is_some_and(|t| t.role != TaxonomyRole::Custom)
            })
        });

        let mut categories = Vec::new();
        let mut tags = Vec::new();
        let mut taxonomies: BTreeMap<String, Vec<TermRef>> = BTreeMap::new();

        let mut attached: Vec<&Term> = item.term_ids.iter().filter_map(|id| terms.get(id)).collect();
        attached.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        for term in attached {
            let term_ref = TermRef {
                id: term.id,
                name: term.name.clone(),
                slug: term.slug.clone(),
                taxonomy: term.taxonomy.clone(),
            };

            match self.registry.taxonomy(&term.taxonomy) {
                Some(tax) if tax.role == TaxonomyRole::Category => categories.push(term_ref.clone()),
                Some(tax) if tax.role == TaxonomyRole::Tag => tags.push(term_ref.clone()),
                Some(tax) if !has_standard && tax.hierarchical => categories.push(term_ref.clone()),
                Some(_) if !has_standard => tags.push(term_ref.clone()),
                _ => {}
            }

            taxonomies.entry(term.taxonomy.clone()).or_default().push(term_ref);
        }

        let author = item
            .author_id
            .and_then(|id| authors.get(&id))
            .map(|a| AuthorRef {
                id: a.id,
                name: a.name.clone(),
                url: format!("{}/author/{}/", self.site_url, a.slug),
            });

        let price = if self.registry.is_commerce(&item.item_type) {
            self.prices.price_info(item)
        } else {
            None
        };

        ItemRecord {
            id: item.id,
            title: item.title.clone(),
            excerpt: text::excerpt_for(item.excerpt.as_deref(), &item.content),
            content: text::sanitize_html(&item.content),
            link: self.permalink(item),
            date: format_timestamp(item.created),
            modified: format_timestamp(item.changed),
            post_type: item.item_type.clone(),
            post_type_label,
            featured_image: item
                .get_field::<ImageRef>("featured_image")
                .filter(|img| !img.url.is_empty()),
            categories,
            tags,
            taxonomies,
            author,
            price,
        }
    }

    /// Canonical link of an item.
    pub fn permalink(&self, item: &Item) -> String {
        if item.item_type == ROOT_TYPE {
            format!("{}/{}/", self.site_url, item.slug)
        } else {
            format!("{}/{}/{}/", self.site_url, item.item_type, item.slug)
        }
    }
}

/// Unix seconds as an RFC 3339 UTC timestamp.
fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
