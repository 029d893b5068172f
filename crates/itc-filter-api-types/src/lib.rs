//! Wire types shared by the itc-filter server and its clients.
//!
//! Field names follow the public JSON contract of `GET /itc/v1/posts/`, which
//! mixes snake_case (`thumbnail_url`) and camelCase (`maxPages`) keys.

use serde::{Deserialize, Serialize};

/// One search hit as returned by the posts endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    /// Post title, verbatim.
    pub name: String,
    /// Truncated excerpt, always terminated by `...`.
    pub description: String,
    pub thumbnail_url: Option<String>,
}

/// A page of search results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsPage {
    pub posts: Vec<PostSummary>,
    #[serde(rename = "maxPages")]
    pub max_pages: u32,
    #[serde(rename = "currentPage")]
    pub current_page: u32,
}

/// A category or tag reference used to populate filter options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Term {
    pub name: String,
    pub slug: String,
}

/// Query parameters accepted by the posts endpoint.
///
/// Every field is kept as raw text; coercion (for example of a malformed
/// `page`) happens server side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    /// Comma-separated tag slugs.
    pub tags: Option<String>,
    pub page: Option<String>,
}
