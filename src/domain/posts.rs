//! Search result shapes.

use std::num::NonZeroU32;

use super::{entities::PostRecord, excerpt};

/// Requested thumbnail rendition edge, in pixels.
pub const THUMBNAIL_WIDTH: i32 = 150;
pub const THUMBNAIL_HEIGHT: i32 = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub thumbnail_url: Option<String>,
}

impl From<PostRecord> for PostSummary {
    fn from(record: PostRecord) -> Self {
        let excerpt = excerpt::description(&record.excerpt, &record.body_markdown);
        Self {
            id: record.id,
            title: record.title,
            excerpt,
            thumbnail_url: record.thumbnail_url,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub posts: Vec<PostSummary>,
    pub total_pages: u32,
    /// Page that was requested, even when it lies past `total_pages`.
    pub current_page: NonZeroU32,
}
