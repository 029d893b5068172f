//! JSON endpoints consumed by the filter form.

use axum::{
    Json,
    extract::{RawQuery, State},
};
use itc_filter_api_types::{PostsPage, PostsQuery, Term};
use url::form_urlencoded;

use crate::application::error::HttpError;
use crate::domain::criteria::FilterCriteria;

use super::HttpState;

pub(super) async fn list_posts(
    State(state): State<HttpState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<PostsPage>, HttpError> {
    let query = posts_query(raw.as_deref().unwrap_or_default());
    let criteria = FilterCriteria::from_endpoint_params(
        query.keyword.as_deref(),
        query.category.as_deref(),
        query.tags.as_deref(),
        query.page.as_deref(),
    );

    let result = state.search.search(&criteria).await?;
    Ok(Json(PostsPage::from(result)))
}

/// Endpoint parameters from a raw query string.
///
/// Never rejects a request: repeated keys keep the last value and unknown
/// keys are ignored.
fn posts_query(raw: &str) -> PostsQuery {
    let mut query = PostsQuery::default();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let slot = match key.as_ref() {
            "keyword" => &mut query.keyword,
            "category" => &mut query.category,
            "tags" => &mut query.tags,
            "page" => &mut query.page,
            _ => continue,
        };
        *slot = Some(value.into_owned());
    }
    query
}

pub(super) async fn list_categories(
    State(state): State<HttpState>,
) -> Result<Json<Vec<Term>>, HttpError> {
    Ok(Json(state.taxonomy.categories().await?))
}

pub(super) async fn list_tags(State(state): State<HttpState>) -> Result<Json<Vec<Term>>, HttpError> {
    Ok(Json(state.taxonomy.tags().await?))
}
