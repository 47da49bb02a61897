//! Runs reducer effects against a [`PortfolioApi`].

use std::collections::VecDeque;

use tracing::debug;
use vitrine_sdk::types::ContentTypeOption;

use crate::action::{Action, Effect};
use crate::error::ClientError;
use crate::render;
use crate::state::{ControllerConfig, ControllerState};
use crate::transport::PortfolioApi;

/// Controller state plus the API it fetches from.
///
/// [`dispatch`](Self::dispatch) runs an action to completion. Callers that
/// need to interleave responses (or hold one back) use
/// [`begin`](Self::begin) and [`complete`](Self::complete) instead.
pub struct PortfolioController<A> {
    state: ControllerState,
    api: A,
}

impl<A: PortfolioApi> PortfolioController<A> {
    pub fn new(config: ControllerConfig, api: A) -> Self {
        Self {
            state: ControllerState::new(config),
            api,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current widget HTML.
    pub fn render(&self) -> String {
        render::render(&self.state)
    }

    /// Apply an action without running the resulting fetches.
    pub fn begin(&mut self, action: Action) -> Vec<Effect> {
        self.state.dispatch(action)
    }

    /// Run one fetch and turn its outcome into an action.
    pub async fn perform(&self, effect: &Effect) -> Action {
        match effect {
            Effect::FetchItems { seq, request } => match self.api.fetch_items(request).await {
                Ok(page) => Action::ItemsLoaded { seq: *seq, page },
                Err(e) => Action::ItemsFailed {
                    seq: *seq,
                    message: e.user_message(),
                },
            },
            Effect::FetchCatalog { seq, params } => match self.api.fetch_catalog(params).await {
                Ok(catalog) => Action::CatalogLoaded { seq: *seq, catalog },
                Err(e) => Action::CatalogFailed {
                    seq: *seq,
                    message: e.user_message(),
                },
            },
        }
    }

    /// Run a fetch and apply its outcome, returning any follow-up effects.
    pub async fn complete(&mut self, effect: &Effect) -> Vec<Effect> {
        let outcome = self.perform(effect).await;
        self.state.dispatch(outcome)
    }

    /// Apply an action and run every fetch it triggers.
    pub async fn dispatch(&mut self, action: Action) {
        let mut queue: VecDeque<Effect> = self.begin(action).into();
        while let Some(effect) = queue.pop_front() {
            debug!(seq = effect.seq(), "running effect");
            queue.extend(self.complete(&effect).await);
        }
    }

    /// Content types offered for selection.
    pub async fn content_types(&self) -> Result<Vec<ContentTypeOption>, ClientError> {
        self.api.content_types().await
    }
}
