//! Form state and its pure transitions.

use std::num::NonZeroU32;

use itc_filter_api_types::{PostsPage, Term};

use crate::domain::criteria::FilterCriteria;

/// Lifecycle of the most recently issued post fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    FetchStarted {
        seq: u64,
    },
    SetResults {
        seq: u64,
        requested_page: NonZeroU32,
        page: PostsPage,
    },
    FetchFailed {
        seq: u64,
        message: String,
    },
    SetPage(NonZeroU32),
    SetCategories(Vec<Term>),
    SetTags(Vec<Term>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Values bound to the form inputs, including the selected page.
    pub draft: FilterCriteria,
    pub results: PostsPage,
    pub categories: Vec<Term>,
    pub tags: Vec<Term>,
    pub status: FetchStatus,
    /// Sequence number of the latest fetch; older completions are dropped.
    pub latest_seq: u64,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            draft: FilterCriteria::default(),
            results: PostsPage {
                posts: Vec::new(),
                max_pages: 1,
                current_page: 1,
            },
            categories: Vec::new(),
            tags: Vec::new(),
            status: FetchStatus::Idle,
            latest_seq: 0,
        }
    }
}

impl FormState {
    pub fn with_draft(draft: FilterCriteria) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn reduce(self, action: FormAction) -> Self {
        match action {
            FormAction::FetchStarted { seq } => Self {
                status: FetchStatus::Loading,
                latest_seq: seq,
                ..self
            },
            FormAction::SetResults { seq, .. } | FormAction::FetchFailed { seq, .. }
                if seq != self.latest_seq =>
            {
                self
            }
            FormAction::SetResults {
                requested_page,
                mut page,
                ..
            } => {
                page.current_page = requested_page.get();
                Self {
                    results: page,
                    status: FetchStatus::Ready,
                    ..self
                }
            }
            FormAction::FetchFailed { message, .. } => Self {
                status: FetchStatus::Failed { message },
                ..self
            },
            FormAction::SetPage(page) => {
                let draft = self.draft.clone().with_page(page);
                Self { draft, ..self }
            }
            FormAction::SetCategories(categories) => Self { categories, ..self },
            FormAction::SetTags(tags) => Self { tags, ..self },
        }
    }

    pub fn is_tag_selected(&self, slug: &str) -> bool {
        self.draft.tags.iter().any(|selected| selected == slug)
    }
}
