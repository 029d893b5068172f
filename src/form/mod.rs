//! Filter form controller.
//!
//! The controller owns a [`FormState`], drives it through
//! [`FormState::reduce`] and talks to the search endpoint through a
//! [`FilterApi`]. Every criteria change is mirrored into a [`History`] as a
//! shareable URL.

pub mod api;
pub mod state;
pub mod url;

use std::num::NonZeroU32;

use itc_filter_api_types::PostsPage;
use tracing::warn;

use crate::domain::criteria::FilterCriteria;
use crate::presentation::views::{
    FilterFormTemplate, FilterFormView, TemplateRenderError, render_fragment,
};

pub use api::{FilterApi, FormError, HttpFilterApi, ServiceFilterApi};
pub use state::{FetchStatus, FormAction, FormState};
pub use url::{History, MemoryHistory};

/// A post fetch that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub seq: u64,
    pub criteria: FilterCriteria,
}

pub struct FilterForm<A, H> {
    api: A,
    history: H,
    state: FormState,
    next_seq: u64,
}

impl<A: FilterApi, H: History> FilterForm<A, H> {
    pub fn new(api: A, history: H) -> Self {
        Self {
            api,
            history,
            state: FormState::default(),
            next_seq: 0,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    fn dispatch(&mut self, action: FormAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    /// Load the option lists and the posts for the criteria in the current URL.
    ///
    /// The three requests run concurrently. A failed option list stays empty.
    pub async fn initialize(&mut self) {
        self.state.draft = url::parse_query(self.history.current_query());
        let pending = self.begin_fetch(self.state.draft.clone());

        let (categories, tags, posts) = tokio::join!(
            self.api.categories(),
            self.api.tags(),
            self.api.fetch_posts(&pending.criteria),
        );

        match categories {
            Ok(categories) => self.dispatch(FormAction::SetCategories(categories)),
            Err(err) => warn!(
                target = "itc_filter::form",
                error = %err,
                "failed to load categories"
            ),
        }
        match tags {
            Ok(tags) => self.dispatch(FormAction::SetTags(tags)),
            Err(err) => warn!(
                target = "itc_filter::form",
                error = %err,
                "failed to load tags"
            ),
        }

        self.complete_fetch(pending, posts);
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.state.draft.keyword = keyword.into();
    }

    pub fn set_category(&mut self, slug: impl Into<String>) {
        self.state.draft.category = slug.into();
    }

    /// Select the tag when absent, deselect it when present.
    pub fn toggle_tag(&mut self, slug: &str) {
        let tags = &mut self.state.draft.tags;
        if let Some(index) = tags.iter().position(|selected| selected == slug) {
            tags.remove(index);
        } else {
            tags.push(slug.to_string());
        }
    }

    /// Search with the current inputs from the first page.
    pub async fn submit(&mut self) {
        self.dispatch(FormAction::SetPage(NonZeroU32::MIN));
        self.push_url();
        self.fetch().await;
    }

    /// Move to page `page`; a no-op when that page is already displayed.
    ///
    /// The displayed page only changes on a successful fetch, so a page whose
    /// fetch failed can be requested again.
    pub async fn paginate(&mut self, page: NonZeroU32) {
        if page.get() == self.state.results.current_page {
            return;
        }
        self.dispatch(FormAction::SetPage(page));
        self.push_url();
        self.fetch().await;
    }

    /// Fetch posts for the current draft.
    pub async fn fetch(&mut self) {
        let pending = self.begin_fetch(self.state.draft.clone());
        let outcome = self.api.fetch_posts(&pending.criteria).await;
        self.complete_fetch(pending, outcome);
    }

    /// Issue a fetch for `criteria`; any earlier pending fetch becomes stale.
    pub fn begin_fetch(&mut self, criteria: FilterCriteria) -> PendingFetch {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.dispatch(FormAction::FetchStarted { seq });
        PendingFetch { seq, criteria }
    }

    pub fn complete_fetch(&mut self, pending: PendingFetch, outcome: Result<PostsPage, FormError>) {
        let action = match outcome {
            Ok(page) => FormAction::SetResults {
                seq: pending.seq,
                requested_page: pending.criteria.page,
                page,
            },
            Err(err) => {
                warn!(
                    target = "itc_filter::form",
                    seq = pending.seq,
                    error = %err,
                    "failed to load posts"
                );
                FormAction::FetchFailed {
                    seq: pending.seq,
                    message: err.to_string(),
                }
            }
        };
        self.dispatch(action);
    }

    fn push_url(&mut self) {
        let query = url::to_query(&self.state.draft);
        self.history.push_query(&query);
    }

    pub fn view(&self) -> FilterFormView {
        FilterFormView::from_state(&self.state)
    }

    /// The form fragment as HTML.
    pub fn render(&self) -> Result<String, TemplateRenderError> {
        render_fragment(FilterFormTemplate { view: self.view() })
    }
}
