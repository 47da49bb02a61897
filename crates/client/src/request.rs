//! Query requests built from controller state.

use std::collections::BTreeMap;

use vitrine_sdk::params::{CatalogParams, ItemsParams, join_ids};
use vitrine_sdk::types::{SortKey, SortOrder};

use crate::state::{ControllerState, FilterState};

/// One items fetch, built fresh from a state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub post_types: Vec<String>,
    pub include_commerce: bool,
    pub filters: FilterState,
    pub sort: SortKey,
    pub order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl QueryRequest {
    /// Request for `page` of the current selection and filters.
    pub fn from_state(state: &ControllerState, page: u32) -> Self {
        Self {
            post_types: state.post_types.clone(),
            include_commerce: state.config.include_commerce,
            filters: state.filters.clone(),
            sort: state.sort,
            order: state.order,
            page: page.max(1),
            per_page: state.config.per_page,
        }
    }

    /// Raw API parameters.
    pub fn to_params(&self) -> ItemsParams {
        let filters = &self.filters;

        let taxonomies: BTreeMap<&str, Vec<i64>> = filters
            .taxonomy_terms
            .iter()
            .filter(|(_, terms)| !terms.is_empty())
            .map(|(name, terms)| (name.as_str(), terms.iter().copied().collect()))
            .collect();

        ItemsParams {
            post_types: Some(self.post_types.join(",")),
            include_commerce: self.include_commerce.then(|| "1".to_string()),
            per_page: Some(self.per_page.to_string()),
            page: Some(self.page.to_string()),
            categories: non_empty(join_ids(&filters.categories)),
            tags: non_empty(join_ids(&filters.tags)),
            taxonomies: if taxonomies.is_empty() {
                None
            } else {
                serde_json::to_string(&taxonomies).ok()
            },
            date_from: filters.date_from.clone(),
            date_to: filters.date_to.clone(),
            author: filters.author_id.map(|id| id.to_string()),
            search: filters.search_text.clone(),
            orderby: Some(self.sort.as_str().to_string()),
            order: Some(self.order.as_str().to_string()),
        }
    }

    /// Percent-encoded query string, identical for identical requests.
    pub fn query_string(&self) -> String {
        let params = self.to_params();
        let pairs = [
            ("post_types", params.post_types),
            ("include_commerce", params.include_commerce),
            ("per_page", params.per_page),
            ("page", params.page),
            ("categories", params.categories),
            ("tags", params.tags),
            ("taxonomies", params.taxonomies),
            ("date_from", params.date_from),
            ("date_to", params.date_to),
            ("author", params.author),
            ("search", params.search),
            ("orderby", params.orderby),
            ("order", params.order),
        ];
        encode_pairs(pairs)
    }
}

/// Catalog parameters for the current selection.
pub fn catalog_params(state: &ControllerState) -> CatalogParams {
    CatalogParams {
        post_types: Some(state.post_types.join(",")),
        include_commerce: state.config.include_commerce.then(|| "1".to_string()),
    }
}

/// Percent-encoded catalog query string.
pub fn catalog_query_string(params: &CatalogParams) -> String {
    encode_pairs([
        ("post_types", params.post_types.clone()),
        ("include_commerce", params.include_commerce.clone()),
    ])
}

fn encode_pairs<const N: usize>(pairs: [(&str, Option<String>); N]) -> String {
    pairs
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}={}", urlencoding::encode(&v))))
        .collect::<Vec<_>>()
        .join("&")
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
