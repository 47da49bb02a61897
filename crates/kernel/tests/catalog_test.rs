#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Filter catalog and content-type discovery tests.

mod common;

use common::{TestApp, test_config};
use serde_json::{Value, json};
use vitrine_kernel::Config;
use vitrine_test_utils::{SeedBuilder, authors, terms, test_item};

fn site() -> SeedBuilder {
    SeedBuilder::standard()
        .with_item(
            test_item("post", "One")
                .with_author(authors::ADA)
                .with_terms(&[terms::DESIGN, terms::RUST]),
        )
        .with_item(
            test_item("post", "Two")
                .with_author(authors::ADA)
                .with_terms(&[terms::DESIGN, terms::TYPOGRAPHY]),
        )
        .with_item(
            test_item("post", "Three")
                .with_author(authors::GRACE)
                .with_terms(&[terms::NEWS]),
        )
        .with_item(
            test_item("post", "Draft")
                .with_author(authors::GRACE)
                .with_terms(&[terms::DEVELOPMENT])
                .unpublished(),
        )
        .with_item(
            test_item("portfolio", "Identity")
                .with_author(authors::GRACE)
                .with_terms(&[terms::BRANDING, terms::ILLUSTRATION]),
        )
        .with_item(
            test_item("portfolio", "Website")
                .with_terms(&[terms::WEB, terms::ILLUSTRATION, terms::FRONT_END]),
        )
        .with_item(test_item("product", "Poster").with_terms(&[terms::PRINTS]))
}

fn names(entries: &Value) -> Vec<(String, u64)> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["name"].as_str().unwrap().to_string(), e["count"].as_u64().unwrap()))
        .collect()
}

fn pairs(list: &[(&str, u64)]) -> Vec<(String, u64)> {
    list.iter().map(|(n, c)| (n.to_string(), *c)).collect()
}

#[tokio::test]
async fn post_catalog_counts_published_items_only() {
    let app = TestApp::new(&site()).await;

    let catalog = app.filters("post_types=post").await;
    assert_eq!(names(&catalog["categories"]), pairs(&[("Design", 2), ("News", 1)]));
    assert_eq!(names(&catalog["tags"]), pairs(&[("Rust", 1), ("Typography", 1)]));
    assert_eq!(catalog["taxonomies"], json!({}));
    assert_eq!(
        names(&catalog["authors"]),
        pairs(&[("Ada Lovelace", 2), ("Grace Hopper", 1)])
    );

    let design = &catalog["categories"][0];
    assert_eq!(design["id"], terms::DESIGN);
    assert_eq!(design["slug"], "design");
}

#[tokio::test]
async fn commerce_categories_join_the_post_catalog() {
    let app = TestApp::new(&site()).await;

    let catalog = app.filters("post_types=post&include_commerce=1").await;
    assert_eq!(
        names(&catalog["categories"]),
        pairs(&[("Design", 2), ("News", 1), ("Prints", 1)])
    );
}

#[tokio::test]
async fn custom_taxonomies_are_grouped_by_name() {
    let app = TestApp::new(&site()).await;

    let catalog = app.filters("post_types=portfolio").await;
    assert_eq!(catalog["categories"], json!([]));
    assert_eq!(catalog["tags"], json!([]));

    let projects = &catalog["taxonomies"]["portfolio_category"];
    assert_eq!(projects["label"], "Project Categories");
    assert_eq!(projects["hierarchical"], true);
    assert_eq!(names(&projects["terms"]), pairs(&[("Branding", 1), ("Web", 1)]));

    let skills = &catalog["taxonomies"]["skills"];
    assert_eq!(
        names(&skills["terms"]),
        pairs(&[("Front-end", 1), ("Illustration", 2)])
    );

    // Website has no author.
    assert_eq!(names(&catalog["authors"]), pairs(&[("Grace Hopper", 1)]));
}

#[tokio::test]
async fn excluded_items_are_not_counted() {
    // "One" is the first seeded item.
    let config = Config {
        excluded_item_ids: vec![1000],
        ..test_config()
    };
    let app = TestApp::with_config(&site(), config).await;

    let catalog = app.filters("post_types=post").await;
    assert_eq!(names(&catalog["categories"]), pairs(&[("Design", 1), ("News", 1)]));
    assert_eq!(names(&catalog["tags"]), pairs(&[("Typography", 1)]));
    assert_eq!(
        names(&catalog["authors"]),
        pairs(&[("Ada Lovelace", 1), ("Grace Hopper", 1)])
    );

    let page = app.items("post_types=post").await;
    assert_eq!(page["total"], 2);
}

#[tokio::test]
async fn unknown_selection_has_an_empty_catalog() {
    let app = TestApp::new(&site()).await;

    let catalog = app.filters("post_types=doesnotexist").await;
    assert_eq!(
        catalog,
        json!({"categories": [], "tags": [], "taxonomies": {}, "authors": []})
    );
}

#[tokio::test]
async fn catalogs_are_cached_per_selection() {
    let app = TestApp::new(&site()).await;
    let metrics = app.state.metrics();

    let first = app.filters("post_types=post,portfolio").await;
    let second = app.filters("post_types=portfolio,post").await;
    assert_eq!(first, second);
    assert_eq!(metrics.catalog_cache_misses.get(), 1);
    assert_eq!(metrics.catalog_cache_hits.get(), 1);

    app.filters("post_types=post").await;
    assert_eq!(metrics.catalog_cache_misses.get(), 2);

    app.state.catalog().invalidate();
    app.filters("post_types=post").await;
    assert_eq!(metrics.catalog_cache_misses.get(), 3);
}

#[tokio::test]
async fn zero_ttl_disables_the_cache() {
    let config = Config {
        catalog_cache_ttl_secs: 0,
        ..test_config()
    };
    let app = TestApp::with_config(&site(), config).await;

    app.filters("post_types=post").await;
    app.filters("post_types=post").await;
    assert_eq!(app.state.metrics().catalog_cache_hits.get(), 0);
    assert_eq!(app.state.metrics().catalog_cache_misses.get(), 2);
}

#[tokio::test]
async fn content_types_list_public_types() {
    let seed = site()
        .with_private_content_type("page", "Pages")
        .with_content_type("attachment", "Media", &[]);
    let app = TestApp::new(&seed).await;

    let (_, body) = app.get_json("/api/portfolio/content-types").await;
    assert_eq!(
        body,
        json!([
            {"value": "portfolio", "label": "Projects"},
            {"value": "post", "label": "Posts"},
            {"value": "product", "label": "Products"},
        ])
    );
}

#[tokio::test]
async fn excluded_content_types_are_not_offered() {
    let config = Config {
        excluded_content_types: vec!["product".to_string()],
        ..test_config()
    };
    let app = TestApp::with_config(&site(), config).await;

    let (_, body) = app.get_json("/api/portfolio/content-types").await;
    let values: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["portfolio", "post"]);
}
