use async_trait::async_trait;
use itc_filter_api_types::Term;

use crate::application::repos::{RepoError, TermsRepo};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl TermsRepo for PostgresRepositories {
    async fn list_categories(&self) -> Result<Vec<Term>, RepoError> {
        sqlx::query_as::<_, Term>("SELECT name, slug FROM categories ORDER BY LOWER(name), slug")
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_tags(&self) -> Result<Vec<Term>, RepoError> {
        sqlx::query_as::<_, Term>("SELECT name, slug FROM tags ORDER BY LOWER(name), slug")
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}
