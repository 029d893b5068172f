//! Domain entities mirrored from persistent storage.

use time::OffsetDateTime;

/// A published post as matched by a search, with its best thumbnail rendition.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub body_markdown: String,
    pub published_at: Option<OffsetDateTime>,
    pub thumbnail_url: Option<String>,
}
