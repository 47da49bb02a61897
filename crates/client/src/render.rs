//! HTML rendering of controller state.
//!
//! Rendering is a pure function of [`ControllerState`]. Interactive elements
//! carry `data-*` attributes naming the action they trigger, so the host
//! page maps clicks back to [`Action`](crate::action::Action)s.
//!
//! Filter buttons carry `data-filter` set to `category`, `tag`, `author` or
//! `tax:<taxonomy>`, so a custom taxonomy can never be mistaken for one of
//! the built-in groups.

use vitrine_sdk::types::{CatalogEntry, FilterCatalog, ItemRecord};

use crate::pager::{PageLink, page_window};
use crate::state::{ControllerState, FilterKind, PaginationStrategy, Phase};

/// Shown when a completed fetch matched nothing.
pub const EMPTY_MESSAGE: &str = "No content found.";

/// Render the whole widget.
pub fn render(state: &ControllerState) -> String {
    let phase = match state.phase {
        Phase::Idle => "idle",
        Phase::Loading => "loading",
        Phase::Loaded => "loaded",
        Phase::Error(_) => "error",
    };

    let mut html = format!("<div class=\"portfolio\" data-state=\"{phase}\">");
    if let Some(catalog) = &state.catalog {
        html.push_str(&render_filters(state, catalog));
    }
    if let Phase::Error(message) = &state.phase {
        html.push_str(&render_error(message));
    }
    if state.phase == Phase::Loading {
        html.push_str("<div class=\"portfolio-loading\" aria-live=\"polite\">Loading…</div>");
    }
    html.push_str(&render_items(state));
    html.push_str(&render_pagination(state));
    html.push_str("</div>");
    html
}

/// Filter panel built from the catalog, marking active selections.
pub fn render_filters(state: &ControllerState, catalog: &FilterCatalog) -> String {
    let mut html = String::from("<aside class=\"portfolio-filters\">");

    html.push_str(&term_group(state, "Categories", &FilterKind::Category, &catalog.categories));
    html.push_str(&term_group(state, "Tags", &FilterKind::Tag, &catalog.tags));
    for (name, taxonomy) in &catalog.taxonomies {
        html.push_str(&term_group(
            state,
            &taxonomy.label,
            &FilterKind::Taxonomy(name.clone()),
            &taxonomy.terms,
        ));
    }

    if !catalog.authors.is_empty() {
        html.push_str("<section class=\"filter-group\" data-filter=\"author\"><h3>Authors</h3><ul>");
        for author in &catalog.authors {
            let active = state.filters.author_id == Some(author.id);
            html.push_str(&format!(
                "<li><button type=\"button\" class=\"filter-term{}\" data-filter=\"author\" data-term=\"{}\" aria-pressed=\"{active}\">{}</button></li>",
                if active { " is-active" } else { "" },
                author.id,
                entry_label(author),
            ));
        }
        html.push_str("</ul></section>");
    }

    html.push_str(
        "<button type=\"button\" class=\"filter-reset\" data-action=\"reset\">Reset filters</button>",
    );
    html.push_str("</aside>");
    html
}

/// `data-filter` value for a group of terms.
pub fn filter_attr(kind: &FilterKind) -> String {
    match kind {
        FilterKind::Category => "category".to_string(),
        FilterKind::Tag => "tag".to_string(),
        FilterKind::Taxonomy(name) => format!("tax:{name}"),
    }
}

fn term_group(
    state: &ControllerState,
    label: &str,
    kind: &FilterKind,
    entries: &[CatalogEntry],
) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let filter = html_escape(&filter_attr(kind));

    let mut html = format!(
        "<section class=\"filter-group\" data-filter=\"{filter}\"><h3>{}</h3><ul>",
        html_escape(label)
    );
    for entry in entries {
        let active = state.filters.is_selected(kind, entry.id);
        html.push_str(&format!(
            "<li><button type=\"button\" class=\"filter-term{}\" data-filter=\"{filter}\" data-term=\"{}\" aria-pressed=\"{active}\">{}</button></li>",
            if active { " is-active" } else { "" },
            entry.id,
            entry_label(entry),
        ));
    }
    html.push_str("</ul></section>");
    html
}

fn entry_label(entry: &CatalogEntry) -> String {
    format!(
        "{} <span class=\"count\">({})</span>",
        html_escape(&entry.name),
        entry.count
    )
}

/// Error banner with a retry control.
pub fn render_error(message: &str) -> String {
    format!(
        "<div class=\"portfolio-error\" role=\"alert\"><p>{}</p><button type=\"button\" data-action=\"retry\">Retry</button></div>",
        html_escape(message)
    )
}

/// Item grid, or the empty state once a fetch found nothing.
pub fn render_items(state: &ControllerState) -> String {
    if state.is_empty_result() {
        return format!("<p class=\"portfolio-empty\">{EMPTY_MESSAGE}</p>");
    }

    let mut html = String::from("<div class=\"portfolio-grid\">");
    for item in &state.items {
        html.push_str(&render_item(item));
    }
    html.push_str("</div>");
    html
}

/// One item card.
pub fn render_item(item: &ItemRecord) -> String {
    let link = html_escape(&item.link);
    let mut html = format!(
        "<article class=\"portfolio-item\" data-id=\"{}\" data-type=\"{}\">",
        item.id,
        html_escape(&item.post_type)
    );

    if let Some(image) = &item.featured_image {
        html.push_str(&format!(
            "<a class=\"portfolio-thumb\" href=\"{link}\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\"></a>",
            html_escape(&image.url),
            html_escape(&image.alt)
        ));
    }

    html.push_str(&format!(
        "<span class=\"portfolio-type\">{}</span><h2><a href=\"{link}\">{}</a></h2>",
        html_escape(&item.post_type_label),
        html_escape(&item.title)
    ));

    if !item.excerpt.is_empty() {
        html.push_str(&format!(
            "<div class=\"portfolio-excerpt\">{}</div>",
            ammonia::clean(&item.excerpt)
        ));
    }

    if let Some(price) = &item.price {
        let class = if price.on_sale {
            "portfolio-price on-sale"
        } else {
            "portfolio-price"
        };
        html.push_str(&format!(
            "<div class=\"{class}\">{}</div>",
            ammonia::clean(&price.price_html)
        ));
    }

    let terms: Vec<String> = item
        .categories
        .iter()
        .chain(&item.tags)
        .map(|t| format!("<li>{}</li>", html_escape(&t.name)))
        .collect();
    if !terms.is_empty() {
        html.push_str(&format!("<ul class=\"portfolio-terms\">{}</ul>", terms.concat()));
    }

    if let Some(author) = &item.author {
        html.push_str(&format!(
            "<a class=\"portfolio-author\" href=\"{}\">{}</a>",
            html_escape(&author.url),
            html_escape(&author.name)
        ));
    }

    html.push_str("</article>");
    html
}

/// Load-more button or numbered pager, depending on the strategy.
pub fn render_pagination(state: &ControllerState) -> String {
    match state.pagination.strategy {
        PaginationStrategy::LoadMore => {
            if state.can_load_more() {
                "<button type=\"button\" class=\"load-more\" data-action=\"load-more\">Load more</button>"
                    .to_string()
            } else {
                String::new()
            }
        }
        PaginationStrategy::Numbered => {
            let links = page_window(state.pagination.current_page, state.pagination.total_pages);
            if links.is_empty() {
                return String::new();
            }
            let mut html = String::from("<nav class=\"pagination\" aria-label=\"Pagination\">");
            for link in links {
                match link {
                    PageLink::Page { number, current: true } => html.push_str(&format!(
                        "<button type=\"button\" class=\"page is-current\" data-page=\"{number}\" aria-current=\"page\">{number}</button>"
                    )),
                    PageLink::Page { number, .. } => html.push_str(&format!(
                        "<button type=\"button\" class=\"page\" data-page=\"{number}\">{number}</button>"
                    )),
                    PageLink::Ellipsis => html.push_str("<span class=\"ellipsis\">…</span>"),
                }
            }
            html.push_str("</nav>");
            html
        }
    }
}

/// HTML-escape a string for text and attribute output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::BTreeMap;

    use vitrine_sdk::types::{AuthorRef, PriceInfo, TaxonomyCatalog, TermRef};

    use super::*;
    use crate::state::ControllerConfig;

    fn item(id: i64, title: &str) -> ItemRecord {
        ItemRecord {
            id,
            title: title.to_string(),
            excerpt: "<p>Short <em>summary</em></p>".to_string(),
            content: String::new(),
            link: format!("https://example.test/{id}/"),
            date: "2024-01-01T00:00:00Z".to_string(),
            modified: "2024-01-01T00:00:00Z".to_string(),
            post_type: "post".to_string(),
            post_type_label: "Posts".to_string(),
            featured_image: None,
            categories: vec![TermRef {
                id: 10,
                name: "Design".to_string(),
                slug: "design".to_string(),
                taxonomy: "category".to_string(),
            }],
            tags: Vec::new(),
            taxonomies: BTreeMap::new(),
            author: Some(AuthorRef {
                id: 1,
                name: "Ada".to_string(),
                url: "https://example.test/author/ada/".to_string(),
            }),
            price: None,
        }
    }

    fn entry(id: i64, name: &str, count: u64) -> CatalogEntry {
        CatalogEntry {
            id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            count,
        }
    }

    fn loaded(strategy: PaginationStrategy) -> ControllerState {
        let mut state = ControllerState::new(ControllerConfig {
            strategy,
            ..ControllerConfig::default()
        });
        state.phase = Phase::Loaded;
        state.items = vec![item(1, "Fish & <Chips>")];
        state.pagination.total_pages = 8;
        state
    }

    #[test]
    fn items_are_escaped() {
        let html = render(&loaded(PaginationStrategy::LoadMore));
        assert!(html.contains("data-state=\"loaded\""));
        assert!(html.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(html.contains("<em>summary</em>"));
        assert!(html.contains("<li>Design</li>"));
        assert!(html.contains("href=\"https://example.test/author/ada/\""));
    }

    #[test]
    fn unsafe_markup_in_records_is_cleaned() {
        let mut record = item(2, "Poster");
        record.excerpt = "<p onclick=\"x()\">Hi</p><script>x()</script>".to_string();
        record.price = Some(PriceInfo {
            price: "25.00".to_string(),
            regular_price: Some("30.00".to_string()),
            sale_price: Some("25.00".to_string()),
            on_sale: true,
            price_html: "<span class=\"price\"><del>$30.00</del> <ins>$25.00</ins></span>".to_string(),
        });

        let html = render_item(&record);
        assert!(!html.contains("script"));
        assert!(!html.contains("onclick"));
        assert!(html.contains("<del>$30.00</del>"));
        assert!(html.contains("class=\"portfolio-price on-sale\""));
    }

    #[test]
    fn empty_state() {
        let mut state = loaded(PaginationStrategy::LoadMore);
        state.items.clear();
        state.pagination.total_pages = 0;

        let html = render(&state);
        assert!(html.contains(EMPTY_MESSAGE));
        assert!(!html.contains("portfolio-grid"));
        assert!(!html.contains("load-more"));
    }

    #[test]
    fn error_banner_keeps_items() {
        let mut state = loaded(PaginationStrategy::LoadMore);
        state.phase = Phase::Error("Could not reach the server.".to_string());

        let html = render(&state);
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("data-action=\"retry\""));
        assert!(html.contains("data-id=\"1\""));
    }

    #[test]
    fn load_more_button() {
        let mut state = loaded(PaginationStrategy::LoadMore);
        assert!(render_pagination(&state).contains("data-action=\"load-more\""));

        state.pagination.current_page = 8;
        assert!(render_pagination(&state).is_empty());
    }

    #[test]
    fn numbered_pager() {
        let mut state = loaded(PaginationStrategy::Numbered);
        state.pagination.current_page = 4;

        let html = render_pagination(&state);
        assert!(html.contains("data-page=\"4\" aria-current=\"page\""));
        assert!(html.contains("data-page=\"8\""));
        assert!(html.contains("class=\"ellipsis\""));
        assert!(!html.contains("data-page=\"7\""));
    }

    #[test]
    fn filters_mark_active_terms() {
        let mut state = loaded(PaginationStrategy::LoadMore);
        state.filters.toggle(&FilterKind::Category, 10);
        state.filters.toggle(&FilterKind::Taxonomy("skills".to_string()), 41);
        state.filters.author_id = Some(2);

        let mut taxonomies = BTreeMap::new();
        taxonomies.insert(
            "skills".to_string(),
            TaxonomyCatalog {
                label: "Skills".to_string(),
                hierarchical: false,
                terms: vec![entry(40, "Illustration", 2), entry(41, "Front-end", 1)],
            },
        );
        let catalog = FilterCatalog {
            categories: vec![entry(10, "Design", 3), entry(11, "News", 1)],
            tags: Vec::new(),
            taxonomies,
            authors: vec![entry(2, "Grace", 4)],
        };

        let html = render_filters(&state, &catalog);
        assert!(html.contains(
            "class=\"filter-term is-active\" data-filter=\"category\" data-term=\"10\" aria-pressed=\"true\""
        ));
        assert!(html.contains("data-filter=\"category\" data-term=\"11\" aria-pressed=\"false\""));
        assert!(html.contains("data-filter=\"tax:skills\" data-term=\"41\" aria-pressed=\"true\""));
        assert!(html.contains("data-filter=\"author\" data-term=\"2\" aria-pressed=\"true\""));
        assert!(html.contains("<h3>Skills</h3>"));
        assert!(!html.contains("<h3>Tags</h3>"));
        assert!(html.contains("Design <span class=\"count\">(3)</span>"));
        assert!(html.contains("data-action=\"reset\""));
    }

    #[test]
    fn taxonomies_named_like_builtin_groups_stay_distinct() {
        let mut state = loaded(PaginationStrategy::LoadMore);
        state.filters.toggle(&FilterKind::Taxonomy("author".to_string()), 50);
        state.filters.author_id = Some(2);

        let mut taxonomies = BTreeMap::new();
        taxonomies.insert(
            "author".to_string(),
            TaxonomyCatalog {
                label: "Book Authors".to_string(),
                hierarchical: false,
                terms: vec![entry(50, "Le Guin", 1), entry(2, "Pratchett", 2)],
            },
        );
        let catalog = FilterCatalog {
            taxonomies,
            authors: vec![entry(2, "Grace", 4)],
            ..Default::default()
        };

        let html = render_filters(&state, &catalog);
        assert!(html.contains("data-filter=\"tax:author\" data-term=\"50\" aria-pressed=\"true\""));
        // Term 2 of the taxonomy is not the selected author 2.
        assert!(html.contains("data-filter=\"tax:author\" data-term=\"2\" aria-pressed=\"false\""));
        assert!(html.contains("data-filter=\"author\" data-term=\"2\" aria-pressed=\"true\""));
        assert_eq!(html.matches("data-filter=\"author\"").count(), 2);
    }

    #[test]
    fn filter_attrs_are_namespaced() {
        assert_eq!(filter_attr(&FilterKind::Category), "category");
        assert_eq!(filter_attr(&FilterKind::Tag), "tag");
        assert_eq!(filter_attr(&FilterKind::Taxonomy("category".to_string())), "tax:category");
    }

    #[test]
    fn escape() {
        assert_eq!(html_escape("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    }
}
