//! In-memory content repository backed by a seed document.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use vitrine_sdk::types::{SortKey, SortOrder};

use super::{AuthorCount, ContentRepository, ItemPage, ItemQuery, TermCount};
use crate::content::Seed;
use crate::models::{Author, ContentType, Item, Taxonomy, Term};

/// Repository holding a whole content set in memory.
///
/// Contents are fixed at construction; rebuild the repository to pick up a
/// changed seed.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    content_types: Vec<ContentType>,
    taxonomies: Vec<Taxonomy>,
    terms: HashMap<i64, Term>,
    authors: HashMap<i64, Author>,
    items: Vec<Item>,
}

impl MemoryRepository {
    /// Build a repository from a validated seed.
    pub fn from_seed(seed: &Seed) -> Result<Self> {
        Ok(Self {
            content_types: seed.content_types.clone(),
            taxonomies: seed.taxonomies.clone(),
            terms: seed.terms.iter().map(|t| (t.id, t.clone())).collect(),
            authors: seed.authors.iter().map(|a| (a.id, a.clone())).collect(),
            items: seed.stored_items()?,
        })
    }

    /// Load a seed file and build a repository from it.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_seed(&Seed::load(path)?)
    }

    /// Number of stored items, published or not.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn published_of<'a>(
        &'a self,
        types: &'a [String],
        exclude_ids: &'a [i64],
    ) -> impl Iterator<Item = &'a Item> {
        self.items.iter().filter(move |item| {
            item.is_published()
                && types.contains(&item.item_type)
                && !exclude_ids.contains(&item.id)
        })
    }

    fn run_query(&self, query: &ItemQuery) -> ItemPage {
        let mut matched: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| matches(item, query))
            .collect();

        if query.sort == SortKey::Rand {
            matched.shuffle(&mut rand::thread_rng());
        } else {
            matched.sort_by(|a, b| {
                let ord = compare(a, b, query.sort);
                match query.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        let total = matched.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .cloned()
            .collect();

        ItemPage { items, total }
    }
}

fn matches(item: &Item, query: &ItemQuery) -> bool {
    if !item.is_published() || !query.types.contains(&item.item_type) {
        return false;
    }
    if query.exclude_ids.contains(&item.id) {
        return false;
    }
    if !query
        .facets
        .iter()
        .all(|facet| facet.iter().any(|id| item.term_ids.contains(id)))
    {
        return false;
    }
    if query.created_from.is_some_and(|from| item.created < from)
        || query.created_to.is_some_and(|to| item.created > to)
    {
        return false;
    }
    if query.author_id.is_some() && item.author_id != query.author_id {
        return false;
    }
    if let Some(needle) = &query.search {
        let needle = needle.to_lowercase();
        if !item.title.to_lowercase().contains(&needle)
            && !item.content.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

/// Order by sort key, ties broken by id.
fn compare(a: &Item, b: &Item, sort: SortKey) -> Ordering {
    let primary = match sort {
        SortKey::Date => a.created.cmp(&b.created),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Modified => a.changed.cmp(&b.changed),
        SortKey::MenuOrder => a.menu_order.cmp(&b.menu_order),
        SortKey::Rand => Ordering::Equal,
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn content_types(&self) -> Result<Vec<ContentType>> {
        Ok(self.content_types.clone())
    }

    async fn taxonomies(&self) -> Result<Vec<Taxonomy>> {
        Ok(self.taxonomies.clone())
    }

    async fn terms_by_ids(&self, ids: &[i64]) -> Result<Vec<Term>> {
        let mut terms: Vec<Term> = ids
            .iter()
            .filter_map(|id| self.terms.get(id).cloned())
            .collect();
        terms.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        terms.dedup_by_key(|t| t.id);
        Ok(terms)
    }

    async fn authors_by_ids(&self, ids: &[i64]) -> Result<Vec<Author>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.authors.get(id).cloned())
            .collect())
    }

    async fn query_items(&self, query: &ItemQuery) -> Result<ItemPage> {
        Ok(self.run_query(query))
    }

    async fn term_counts(
        &self,
        types: &[String],
        taxonomies: &[String],
        exclude_ids: &[i64],
    ) -> Result<Vec<TermCount>> {
        let mut counts: HashMap<i64, u64> = HashMap::new();
        for item in self.published_of(types, exclude_ids) {
            for id in &item.term_ids {
                *counts.entry(*id).or_default() += 1;
            }
        }

        let mut result: Vec<TermCount> = counts
            .into_iter()
            .filter_map(|(id, count)| {
                let term = self.terms.get(&id)?;
                taxonomies.contains(&term.taxonomy).then(|| TermCount {
                    term: term.clone(),
                    count,
                })
            })
            .collect();
        result.sort_by(|a, b| a.term.name.cmp(&b.term.name).then(a.term.id.cmp(&b.term.id)));
        Ok(result)
    }

    async fn author_counts(
        &self,
        types: &[String],
        exclude_ids: &[i64],
    ) -> Result<Vec<AuthorCount>> {
        let mut counts: HashMap<i64, u64> = HashMap::new();
        for item in self.published_of(types, exclude_ids) {
            if let Some(author) = item.author_id {
                *counts.entry(author).or_default() += 1;
            }
        }

        let mut result: Vec<AuthorCount> = counts
            .into_iter()
            .filter_map(|(id, count)| {
                self.authors.get(&id).map(|author| AuthorCount {
                    author: author.clone(),
                    count,
                })
            })
            .collect();
        result.sort_by(|a, b| {
            a.author
                .name
                .cmp(&b.author.name)
                .then(a.author.id.cmp(&b.author.id))
        });
        Ok(result)
    }

    async fn health(&self) -> bool {
        true
    }
}
