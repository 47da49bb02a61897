//! Query-string parameters of the portfolio API.
//!
//! Every field is carried as the raw string the client sent. The kernel
//! decides how to interpret (or ignore) each value, so a malformed
//! parameter never fails request extraction.

use serde::{Deserialize, Serialize};

/// Parameters of `GET /api/portfolio/items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemsParams {
    /// Comma-separated content type names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_types: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_commerce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Comma-separated category term ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    /// Comma-separated tag term ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// JSON object mapping taxonomy name to an array of term ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomies: Option<String>,
    /// ISO date (`YYYY-MM-DD`), inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// ISO date (`YYYY-MM-DD`), inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// Parameters of `GET /api/portfolio/filters`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_types: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_commerce: Option<String>,
}

/// Interpret a boolean flag the way form posts send them.
///
/// `1`, `true`, `yes` and `on` are true; anything else is false.
pub fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join ids into the comma-separated form used by the API.
pub fn join_ids<'a>(ids: impl IntoIterator<Item = &'a i64>) -> String {
    ids.into_iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
