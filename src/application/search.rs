//! Post search: filter criteria in, one page of summaries out.

use std::{sync::Arc, time::Instant};

use itc_filter_api_types::{PostSummary as WirePostSummary, PostsPage};
use metrics::{counter, histogram};
use thiserror::Error;
use tracing::debug;

use crate::application::pagination::{PAGE_SIZE, page_offset, total_pages};
use crate::application::repos::{PostSearchFilter, PostsRepo, RepoError};
use crate::domain::criteria::FilterCriteria;
use crate::domain::posts::{PageResult, PostSummary};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct SearchService {
    posts: Arc<dyn PostsRepo>,
}

impl SearchService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    pub async fn search(&self, criteria: &FilterCriteria) -> Result<PageResult, SearchError> {
        let started = Instant::now();
        let result = self.run(criteria).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!("itc_filter_search_total", "outcome" => outcome).increment(1);
        histogram!("itc_filter_search_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        result
    }

    async fn run(&self, criteria: &FilterCriteria) -> Result<PageResult, SearchError> {
        let filter = PostSearchFilter::from(criteria);
        let matches = self.posts.count_posts(&filter).await?;
        let total_pages = total_pages(matches, PAGE_SIZE);

        let posts = if page_is_reachable(criteria, total_pages) {
            self.posts
                .search_posts(&filter, PAGE_SIZE, page_offset(criteria.page, PAGE_SIZE))
                .await?
                .into_iter()
                .map(PostSummary::from)
                .collect()
        } else {
            Vec::new()
        };

        debug!(
            target = "itc_filter::search",
            keyword = %criteria.keyword,
            category = %criteria.category,
            tags = ?criteria.tags,
            page = criteria.page.get(),
            matches,
            total_pages,
            "search completed"
        );

        Ok(PageResult {
            posts,
            total_pages,
            current_page: criteria.page,
        })
    }
}

fn page_is_reachable(criteria: &FilterCriteria, total_pages: u32) -> bool {
    criteria.page.get() <= total_pages
}

impl From<PostSummary> for WirePostSummary {
    fn from(summary: PostSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.title,
            description: summary.excerpt,
            thumbnail_url: summary.thumbnail_url,
        }
    }
}

impl From<PageResult> for PostsPage {
    fn from(result: PageResult) -> Self {
        Self {
            posts: result.posts.into_iter().map(Into::into).collect(),
            max_pages: result.total_pages,
            current_page: result.current_page.get(),
        }
    }
}
