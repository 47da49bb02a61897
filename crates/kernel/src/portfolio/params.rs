//! Interpretation of portfolio request parameters.
//!
//! Parameters arrive as raw strings. Anything unparseable is ignored with a
//! warning so that one bad value never breaks a listing. The only exception
//! is malformed `taxonomies` JSON in strict mode.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;
use vitrine_sdk::params::{ItemsParams, parse_flag, split_list};
use vitrine_sdk::types::{SortKey, SortOrder};

/// Content type listed when the request names none.
pub const DEFAULT_POST_TYPE: &str = "post";

/// Parameter errors surfaced to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("malformed taxonomies parameter: {0}")]
    MalformedTaxonomies(String),
}

/// How parameters are interpreted.
#[derive(Debug, Clone, Copy)]
pub struct ParamPolicy {
    pub default_per_page: u32,
    pub max_per_page: u32,
    /// Reject malformed taxonomy JSON instead of ignoring it.
    pub strict_taxonomies: bool,
}

impl Default for ParamPolicy {
    fn default() -> Self {
        Self {
            default_per_page: 12,
            max_per_page: 100,
            strict_taxonomies: false,
        }
    }
}

/// A parsed items request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioRequest {
    pub post_types: Vec<String>,
    pub include_commerce: bool,
    pub per_page: u32,
    pub page: u32,
    pub categories: Vec<i64>,
    pub tags: Vec<i64>,
    /// Taxonomy name to term ids.
    pub taxonomies: BTreeMap<String, Vec<i64>>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub author: Option<i64>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for PortfolioRequest {
    fn default() -> Self {
        Self {
            post_types: vec![DEFAULT_POST_TYPE.to_string()],
            include_commerce: false,
            per_page: ParamPolicy::default().default_per_page,
            page: 1,
            categories: Vec::new(),
            tags: Vec::new(),
            taxonomies: BTreeMap::new(),
            date_from: None,
            date_to: None,
            author: None,
            search: None,
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl PortfolioRequest {
    /// Interpret raw query parameters.
    pub fn from_params(params: &ItemsParams, policy: &ParamPolicy) -> Result<Self, ParamError> {
        let post_types = parse_post_types(params.post_types.as_deref());

        let per_page = match params.per_page.as_deref() {
            Some(raw) => match parse_int("per_page", raw) {
                Some(n) => clamp_u32(n, 1, policy.max_per_page),
                None => policy.default_per_page,
            },
            None => policy.default_per_page,
        };

        let page = params
            .page
            .as_deref()
            .and_then(|raw| parse_int("page", raw))
            .map_or(1, |n| clamp_u32(n, 1, u32::MAX));

        let taxonomies = match params.taxonomies.as_deref() {
            Some(raw) => match parse_taxonomies(raw) {
                Ok(map) => map,
                Err(reason) if policy.strict_taxonomies => {
                    return Err(ParamError::MalformedTaxonomies(reason));
                }
                Err(reason) => {
                    warn!(reason = %reason, "ignoring malformed taxonomies parameter");
                    BTreeMap::new()
                }
            },
            None => BTreeMap::new(),
        };

        let sort = match params.orderby.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => SortKey::from_param(raw).unwrap_or_else(|| {
                warn!(orderby = %raw, "ignoring unknown sort key");
                SortKey::default()
            }),
            None => SortKey::default(),
        };

        let order = match params.order.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => SortOrder::from_param(raw).unwrap_or_else(|| {
                warn!(order = %raw, "ignoring unknown sort order");
                SortOrder::default()
            }),
            None => SortOrder::default(),
        };

        Ok(Self {
            post_types,
            include_commerce: parse_flag(params.include_commerce.as_deref()),
            per_page,
            page,
            categories: parse_id_list("categories", params.categories.as_deref()),
            tags: parse_id_list("tags", params.tags.as_deref()),
            taxonomies,
            date_from: parse_date("date_from", params.date_from.as_deref()),
            date_to: parse_date("date_to", params.date_to.as_deref()),
            author: params
                .author
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .and_then(|raw| parse_id("author", raw)),
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            sort,
            order,
        })
    }
}

/// Requested content types; the default type when none are named.
pub fn parse_post_types(raw: Option<&str>) -> Vec<String> {
    let types = raw.map(split_list).unwrap_or_default();
    if types.is_empty() {
        vec![DEFAULT_POST_TYPE.to_string()]
    } else {
        types
    }
}

fn parse_int(name: &str, raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(param = %name, value = %raw, "ignoring non-numeric parameter");
            None
        }
    }
}

fn clamp_u32(value: i64, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    u32::try_from(clamped).unwrap_or(min)
}

/// Parse a positive id.
fn parse_id(name: &str, raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            warn!(param = %name, value = %raw, "ignoring invalid id");
            None
        }
    }
}

/// Parse a comma-separated id list, skipping invalid entries and duplicates.
fn parse_id_list(name: &str, raw: Option<&str>) -> Vec<i64> {
    let mut ids = Vec::new();
    for entry in raw.map(split_list).unwrap_or_default() {
        if let Some(id) = parse_id(name, &entry)
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    ids
}

fn parse_date(name: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(param = %name, value = %raw, "ignoring unparseable date");
            None
        }
    }
}

/// Parse the `taxonomies` JSON object.
///
/// Term lists may be arrays of numbers or numeric strings, a single number,
/// or a comma-separated string. A blank parameter means no filter.
pub fn parse_taxonomies(raw: &str) -> Result<BTreeMap<String, Vec<i64>>, String> {
    let mut result = BTreeMap::new();
    if raw.trim().is_empty() {
        return Ok(result);
    }

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    let serde_json::Value::Object(map) = value else {
        return Err("expected a JSON object".to_string());
    };

    for (taxonomy, terms) in map {
        let ids = term_ids(&terms)
            .ok_or_else(|| format!("terms of '{taxonomy}' must be a list of ids"))?;
        if !ids.is_empty() {
            result.insert(taxonomy, ids);
        }
    }

    Ok(result)
}

fn term_ids(value: &serde_json::Value) -> Option<Vec<i64>> {
    let mut ids: Vec<i64> = Vec::new();
    let mut push = |id: i64| {
        if id > 0 && !ids.contains(&id) {
            ids.push(id);
        }
    };

    match value {
        serde_json::Value::Array(entries) => {
            for entry in entries {
                push(scalar_id(entry)?);
            }
        }
        serde_json::Value::String(s) => {
            for entry in split_list(s) {
                push(entry.parse().ok()?);
            }
        }
        serde_json::Value::Number(_) => push(scalar_id(value)?),
        serde_json::Value::Null => {}
        _ => return None,
    }

    Some(ids)
}

fn scalar_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
