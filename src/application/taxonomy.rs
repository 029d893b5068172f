//! Category and tag reference lists used to populate filter options.

use std::sync::Arc;

use itc_filter_api_types::Term;

use crate::application::repos::{RepoError, TermsRepo};

#[derive(Clone)]
pub struct TaxonomyService {
    terms: Arc<dyn TermsRepo>,
    hidden_categories: Vec<String>,
}

impl TaxonomyService {
    pub fn new(terms: Arc<dyn TermsRepo>, hidden_categories: Vec<String>) -> Self {
        Self {
            terms,
            hidden_categories,
        }
    }

    /// Categories offered as filter options, without the hidden ones.
    pub async fn categories(&self) -> Result<Vec<Term>, RepoError> {
        let mut categories = self.terms.list_categories().await?;
        categories.retain(|term| !self.hidden_categories.contains(&term.slug));
        Ok(categories)
    }

    pub async fn tags(&self) -> Result<Vec<Term>, RepoError> {
        self.terms.list_tags().await
    }
}
