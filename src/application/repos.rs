//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use itc_filter_api_types::Term;
use thiserror::Error;

use crate::domain::criteria::FilterCriteria;
use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    /// The pool or the statement timed out; the store may recover.
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Search restrictions applied to published posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSearchFilter {
    /// Every term must match the title, excerpt or body.
    pub terms: Vec<String>,
    /// Category slug; descendants of the category match too.
    pub category: Option<String>,
    /// A post matches when it carries any of these tag slugs.
    pub tags: Vec<String>,
}

impl From<&FilterCriteria> for PostSearchFilter {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            terms: criteria.keyword_terms(),
            category: criteria.category_filter().map(str::to_string),
            tags: criteria.tags.clone(),
        }
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Published posts matching `filter`, newest first.
    async fn search_posts(
        &self,
        filter: &PostSearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<PostRecord>, RepoError>;

    async fn count_posts(&self, filter: &PostSearchFilter) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait TermsRepo: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Term>, RepoError>;

    /// All tags ordered by name.
    async fn list_tags(&self) -> Result<Vec<Term>, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
