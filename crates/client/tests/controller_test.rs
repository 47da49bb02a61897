#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Controller behaviour against the real kernel router.

mod common;

use std::collections::HashSet;

use common::{FlakyApi, RouterApi};
use vitrine_client::prelude::*;
use vitrine_test_utils::{SeedBuilder, terms, test_item};

fn config(post_types: &[&str], per_page: u32, strategy: PaginationStrategy) -> ControllerConfig {
    ControllerConfig {
        post_types: post_types.iter().map(|t| t.to_string()).collect(),
        per_page,
        strategy,
        ..ControllerConfig::default()
    }
}

fn ids(state: &ControllerState) -> Vec<i64> {
    state.items.iter().map(|i| i.id).collect()
}

fn titles(state: &ControllerState) -> Vec<String> {
    state.items.iter().map(|i| i.title.clone()).collect()
}

fn projects() -> SeedBuilder {
    SeedBuilder::standard()
        .with_item(test_item("portfolio", "Alpha").with_id(1).with_terms(&[terms::BRANDING, terms::ILLUSTRATION]))
        .with_item(test_item("portfolio", "Bravo").with_id(2).with_terms(&[terms::WEB, terms::ILLUSTRATION]))
        .with_item(test_item("portfolio", "Charlie").with_id(3).with_terms(&[terms::BRANDING, terms::FRONT_END]))
        .with_item(test_item("portfolio", "Delta").with_id(4).with_terms(&[terms::PRINT, terms::PHOTOGRAPHY]))
        .with_item(test_item("portfolio", "Echo").with_id(5).with_terms(&[terms::WEB, terms::PHOTOGRAPHY]))
}

#[tokio::test]
async fn load_more_accumulates_every_item_once() {
    let api = RouterApi::new(&SeedBuilder::standard().with_posts(30)).await;
    let mut controller = PortfolioController::new(config(&["post"], 12, PaginationStrategy::LoadMore), api);

    controller.dispatch(Action::Mount).await;
    assert_eq!(controller.state().items.len(), 12);
    assert_eq!(controller.state().total, 30);

    for expected in [24, 30] {
        assert!(controller.state().can_load_more());
        controller.dispatch(Action::LoadMore).await;
        assert_eq!(controller.state().items.len(), expected);
    }

    let unique: HashSet<i64> = ids(controller.state()).into_iter().collect();
    assert_eq!(unique.len(), 30);
    assert!(!controller.state().can_load_more());

    let before = controller.api().request_count();
    controller.dispatch(Action::LoadMore).await;
    assert_eq!(controller.api().request_count(), before);
    assert_eq!(controller.state().items.len(), 30);
}

#[tokio::test]
async fn numbered_page_holds_exactly_that_page() {
    let api = RouterApi::new(&SeedBuilder::standard().with_posts(30)).await;
    let mut controller = PortfolioController::new(config(&["post"], 12, PaginationStrategy::Numbered), api);

    controller.dispatch(Action::Mount).await;
    controller.dispatch(Action::GoToPage(2)).await;

    let expected: Vec<String> = (7..=18).rev().map(|n| format!("Post {n}")).collect();
    assert_eq!(titles(controller.state()), expected);
    assert_eq!(controller.state().pagination.current_page, 2);
    assert_eq!(controller.state().pagination.total_pages, 3);

    controller.dispatch(Action::GoToPage(99)).await;
    let expected: Vec<String> = (1..=6).rev().map(|n| format!("Post {n}")).collect();
    assert_eq!(titles(controller.state()), expected);
    assert_eq!(controller.state().pagination.current_page, 3);
}

#[tokio::test]
async fn reset_returns_to_the_initial_result() {
    let seed = SeedBuilder::standard()
        .with_posts(5)
        .with_item(test_item("post", "Designed").with_terms(&[terms::DESIGN]));
    let api = RouterApi::new(&seed).await;
    let mut controller = PortfolioController::new(config(&["post"], 12, PaginationStrategy::LoadMore), api);

    controller.dispatch(Action::Mount).await;
    let initial = ids(controller.state());
    assert_eq!(initial.len(), 6);

    controller
        .dispatch(Action::ToggleFilter {
            kind: FilterKind::Category,
            term: terms::DESIGN,
        })
        .await;
    controller.dispatch(Action::SetSearch(Some("designed".to_string()))).await;
    controller
        .dispatch(Action::SetSort {
            key: SortKey::Title,
            order: SortOrder::Asc,
        })
        .await;
    assert_eq!(titles(controller.state()), vec!["Designed"]);

    controller.dispatch(Action::ResetFilters).await;
    assert_eq!(ids(controller.state()), initial);
    assert!(controller.state().filters.is_empty());
    assert_eq!(controller.state().sort, SortKey::Date);
    assert!(controller.state().catalog.is_some());
}

#[tokio::test]
async fn late_responses_never_overwrite_newer_ones() {
    let seed = SeedBuilder::standard()
        .with_item(test_item("post", "Design one").with_id(1).with_terms(&[terms::DESIGN]))
        .with_item(test_item("post", "Design two").with_id(2).with_terms(&[terms::DESIGN]))
        .with_item(test_item("post", "News").with_id(3).with_terms(&[terms::NEWS]));
    let api = RouterApi::new(&seed).await;
    let mut controller = PortfolioController::new(config(&["post"], 12, PaginationStrategy::LoadMore), api);
    controller.dispatch(Action::Mount).await;

    let toggle = |term| Action::ToggleFilter {
        kind: FilterKind::Category,
        term,
    };
    let first = controller.begin(toggle(terms::DESIGN));
    let second = controller.begin(toggle(terms::DESIGN));
    let third = controller.begin(toggle(terms::NEWS));

    // Newest first, then the stale ones.
    for effect in third.iter().chain(&first).chain(&second) {
        assert!(controller.complete(effect).await.is_empty());
    }

    assert_eq!(ids(controller.state()), vec![3]);
    assert_eq!(controller.state().phase, Phase::Loaded);
}

#[tokio::test]
async fn taxonomy_filters_or_within_and_across() {
    let api = RouterApi::new(&projects()).await;
    let mut controller = PortfolioController::new(config(&["portfolio"], 12, PaginationStrategy::LoadMore), api);
    controller.dispatch(Action::Mount).await;

    let catalog = controller.state().catalog.clone().unwrap();
    assert!(catalog.taxonomies.contains_key("portfolio_category"));
    assert!(catalog.taxonomies.contains_key("skills"));

    let taxonomy = |name: &str, term| Action::ToggleFilter {
        kind: FilterKind::Taxonomy(name.to_string()),
        term,
    };

    controller.dispatch(taxonomy("portfolio_category", terms::BRANDING)).await;
    controller.dispatch(taxonomy("portfolio_category", terms::WEB)).await;
    let mut found = ids(controller.state());
    found.sort_unstable();
    assert_eq!(found, vec![1, 2, 3, 5]);

    controller.dispatch(taxonomy("skills", terms::ILLUSTRATION)).await;
    let mut found = ids(controller.state());
    found.sort_unstable();
    assert_eq!(found, vec![1, 2]);
}

#[tokio::test]
async fn content_type_switch_clears_filters_and_reloads_catalog() {
    let seed = projects().with_item(test_item("post", "Journal").with_id(6).with_terms(&[terms::NEWS]));
    let api = RouterApi::new(&seed).await;
    let mut controller = PortfolioController::new(config(&["portfolio"], 12, PaginationStrategy::LoadMore), api);
    controller.dispatch(Action::Mount).await;
    controller
        .dispatch(Action::ToggleFilter {
            kind: FilterKind::Taxonomy("skills".to_string()),
            term: terms::PHOTOGRAPHY,
        })
        .await;
    assert_eq!(controller.state().items.len(), 2);

    controller.dispatch(Action::SetContentTypes(vec!["post".to_string()])).await;
    assert!(controller.state().filters.is_empty());
    assert_eq!(ids(controller.state()), vec![6]);
    let catalog = controller.state().catalog.clone().unwrap();
    assert!(catalog.taxonomies.is_empty());
    assert_eq!(catalog.categories.len(), 1);

    let types = controller.content_types().await.unwrap();
    let values: Vec<&str> = types.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["portfolio", "post", "product"]);
}

#[tokio::test]
async fn failed_fetch_shows_error_and_retry_recovers() {
    let api = FlakyApi::new(RouterApi::new(&SeedBuilder::standard().with_posts(3)).await, 1);
    let mut controller = PortfolioController::new(config(&["post"], 12, PaginationStrategy::LoadMore), api);

    controller.dispatch(Action::Mount).await;
    assert_eq!(
        controller.state().phase,
        Phase::Error("The server could not load this content.".to_string())
    );
    let html = controller.render();
    assert!(html.contains("data-action=\"retry\""));

    controller.dispatch(Action::Retry).await;
    assert_eq!(controller.state().phase, Phase::Loaded);
    assert_eq!(controller.state().items.len(), 3);
    assert!(!controller.render().contains("role=\"alert\""));
}

#[tokio::test]
async fn rendered_widget_reflects_state() {
    let api = RouterApi::new(&projects()).await;
    let mut controller = PortfolioController::new(config(&["portfolio"], 2, PaginationStrategy::Numbered), api);
    controller.dispatch(Action::Mount).await;
    controller
        .dispatch(Action::ToggleFilter {
            kind: FilterKind::Taxonomy("skills".to_string()),
            term: terms::PHOTOGRAPHY,
        })
        .await;

    let html = controller.render();
    assert!(html.contains("<h3>Skills</h3>"));
    assert!(html.contains(&format!("data-term=\"{}\" aria-pressed=\"true\"", terms::PHOTOGRAPHY)));
    assert!(html.contains("Delta"));
    assert!(html.contains("Echo"));
    assert!(!html.contains("class=\"pagination\""));

    controller
        .dispatch(Action::ToggleFilter {
            kind: FilterKind::Taxonomy("portfolio_category".to_string()),
            term: terms::BRANDING,
        })
        .await;
    assert!(controller.state().is_empty_result());
    assert!(controller.render().contains("No content found."));
}
