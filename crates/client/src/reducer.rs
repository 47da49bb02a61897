//! State transitions.
//!
//! [`ControllerState::dispatch`] applies one action and returns the fetches
//! the driver has to run. It performs no I/O itself.
//!
//! Every fetch gets a fresh sequence number. A response is applied only
//! when its number is the one the state is waiting for, so a slow response
//! to an earlier request can never overwrite a newer one.

use tracing::{debug, warn};
use vitrine_sdk::types::PortfolioPage;

use crate::action::{Action, Effect, FetchMode, PendingFetch};
use crate::request::{QueryRequest, catalog_params};
use crate::state::{ControllerState, Phase};

impl ControllerState {
    /// Apply an action, returning the effects to perform.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mount => vec![self.fetch_items(1, FetchMode::Replace), self.fetch_catalog()],

            Action::ToggleFilter { kind, term } => {
                self.filters.toggle(&kind, term);
                self.restart()
            }

            Action::SetSearch(text) => {
                let text = text
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());
                if text == self.filters.search_text {
                    return Vec::new();
                }
                self.filters.search_text = text;
                self.restart()
            }

            Action::SetDateRange { from, to } => {
                let from = from.filter(|d| !d.trim().is_empty());
                let to = to.filter(|d| !d.trim().is_empty());
                if from == self.filters.date_from && to == self.filters.date_to {
                    return Vec::new();
                }
                self.filters.date_from = from;
                self.filters.date_to = to;
                self.restart()
            }

            Action::SetAuthor(author) => {
                let author = author.filter(|id| *id > 0);
                if author == self.filters.author_id {
                    return Vec::new();
                }
                self.filters.author_id = author;
                self.restart()
            }

            Action::SetSort { key, order } => {
                if key == self.sort && order == self.order {
                    return Vec::new();
                }
                self.sort = key;
                self.order = order;
                self.restart()
            }

            Action::SetContentTypes(types) => {
                let mut selected: Vec<String> = Vec::with_capacity(types.len());
                for name in types.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
                    if !selected.iter().any(|s| s == name) {
                        selected.push(name.to_string());
                    }
                }
                if selected.is_empty() {
                    selected = self.config.post_types.clone();
                }

                self.post_types = selected;
                self.filters.clear();
                self.catalog = None;
                let mut effects = self.restart();
                effects.push(self.fetch_catalog());
                effects
            }

            Action::GoToPage(page) => {
                let last = self.pagination.total_pages.max(1);
                let page = page.clamp(1, last);
                if page == self.pagination.current_page && self.phase == Phase::Loaded {
                    return Vec::new();
                }
                vec![self.fetch_items(page, FetchMode::Replace)]
            }

            Action::LoadMore => {
                if !self.can_load_more() {
                    return Vec::new();
                }
                let next = self.pagination.current_page + 1;
                vec![self.fetch_items(next, FetchMode::Append)]
            }

            Action::ResetFilters => {
                self.filters.clear();
                self.sort = self.config.sort;
                self.order = self.config.order;
                let mut effects = self.restart();
                effects.push(self.fetch_catalog());
                effects
            }

            Action::Retry => {
                if !matches!(self.phase, Phase::Error(_)) {
                    return Vec::new();
                }
                let Some(last) = self.last_items_fetch.clone() else {
                    return Vec::new();
                };
                vec![self.issue(last.request, last.mode)]
            }

            Action::ItemsLoaded { seq, page } => {
                let Some(pending) = self.take_pending_items(seq) else {
                    return Vec::new();
                };
                self.apply_page(pending, page)
            }

            Action::ItemsFailed { seq, message } => {
                if self.take_pending_items(seq).is_some() {
                    warn!(seq, error = %message, "items fetch failed");
                    self.phase = Phase::Error(message);
                }
                Vec::new()
            }

            Action::CatalogLoaded { seq, catalog } => {
                if self.take_pending_catalog(seq) {
                    self.catalog = Some(catalog);
                }
                Vec::new()
            }

            Action::CatalogFailed { seq, message } => {
                if self.take_pending_catalog(seq) {
                    warn!(seq, error = %message, "catalog fetch failed");
                }
                Vec::new()
            }
        }
    }

    /// Back to page 1 with the current filters.
    fn restart(&mut self) -> Vec<Effect> {
        self.pagination.current_page = 1;
        vec![self.fetch_items(1, FetchMode::Replace)]
    }

    fn fetch_items(&mut self, page: u32, mode: FetchMode) -> Effect {
        let request = QueryRequest::from_state(self, page);
        self.issue(request, mode)
    }

    fn issue(&mut self, request: QueryRequest, mode: FetchMode) -> Effect {
        let seq = self.next_seq();
        let pending = PendingFetch {
            seq,
            request: request.clone(),
            mode,
        };
        self.pending_items = Some(pending.clone());
        self.last_items_fetch = Some(pending);
        self.phase = Phase::Loading;
        Effect::FetchItems { seq, request }
    }

    fn fetch_catalog(&mut self) -> Effect {
        let seq = self.next_seq();
        self.pending_catalog = Some(seq);
        Effect::FetchCatalog {
            seq,
            params: catalog_params(self),
        }
    }

    fn take_pending_items(&mut self, seq: u64) -> Option<PendingFetch> {
        if self.awaited_items() == Some(seq) {
            self.pending_items.take()
        } else {
            debug!(seq, awaited = ?self.awaited_items(), "discarding stale items response");
            None
        }
    }

    fn take_pending_catalog(&mut self, seq: u64) -> bool {
        if self.pending_catalog == Some(seq) {
            self.pending_catalog = None;
            true
        } else {
            debug!(seq, awaited = ?self.pending_catalog, "discarding stale catalog response");
            false
        }
    }

    fn apply_page(&mut self, pending: PendingFetch, page: PortfolioPage) -> Vec<Effect> {
        let requested = pending.request.page;

        // The result set shrank under a page jump; show its last page instead.
        if pending.mode == FetchMode::Replace && page.pages > 0 && requested > page.pages {
            debug!(requested, pages = page.pages, "page out of range, loading last page");
            return vec![self.issue(
                QueryRequest {
                    page: page.pages,
                    ..pending.request
                },
                FetchMode::Replace,
            )];
        }

        self.total = page.total;
        self.pagination.total_pages = page.pages;

        match pending.mode {
            FetchMode::Replace => self.items = page.items,
            FetchMode::Append => {
                for item in page.items {
                    if !self.items.iter().any(|existing| existing.id == item.id) {
                        self.items.push(item);
                    }
                }
            }
        }

        self.pagination.current_page = if page.pages == 0 {
            1
        } else {
            requested.min(page.pages)
        };
        self.phase = Phase::Loaded;
        Vec::new()
    }
}
