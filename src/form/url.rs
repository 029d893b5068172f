//! Shareable URL encoding of filter criteria and the history seam.

use std::num::NonZeroU32;

use url::form_urlencoded;

use crate::domain::criteria::FilterCriteria;

pub const KEYWORD_PARAM: &str = "q";
pub const CATEGORY_PARAM: &str = "cat";
pub const TAG_PARAM: &str = "tags[]";
pub const PAGE_PARAM: &str = "current-page";

/// Criteria encoded in a page URL query string (without the leading `?`).
///
/// Unknown parameters are ignored; repeated scalar parameters keep the last
/// value.
pub fn parse_query(query: &str) -> FilterCriteria {
    let mut criteria = FilterCriteria::default();
    let mut page = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            KEYWORD_PARAM => criteria.keyword = value.into_owned(),
            CATEGORY_PARAM => criteria.category = value.into_owned(),
            TAG_PARAM if !value.is_empty() => criteria.tags.push(value.into_owned()),
            PAGE_PARAM => page = Some(value.into_owned()),
            _ => {}
        }
    }

    criteria.page = page_from_url(page.as_deref());
    criteria
}

/// Page number from the leading digits of a URL value, so `3abc` is page 3.
///
/// Anything without a positive leading number is page 1.
fn page_from_url(raw: Option<&str>) -> NonZeroU32 {
    let Some(raw) = raw else {
        return NonZeroU32::MIN;
    };
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..digits_end]
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN)
}

/// Query string for `criteria`; empty values and page 1 are omitted.
pub fn to_query(criteria: &FilterCriteria) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if !criteria.keyword.is_empty() {
        serializer.append_pair(KEYWORD_PARAM, &criteria.keyword);
    }
    if !criteria.category.is_empty() {
        serializer.append_pair(CATEGORY_PARAM, &criteria.category);
    }
    for tag in &criteria.tags {
        serializer.append_pair(TAG_PARAM, tag);
    }
    if criteria.page.get() > 1 {
        serializer.append_pair(PAGE_PARAM, &criteria.page.to_string());
    }
    serializer.finish()
}

/// Browser-style history the form pushes shareable URLs onto.
pub trait History: Send + Sync {
    /// Query string of the current entry, without the leading `?`.
    fn current_query(&self) -> &str;

    /// Push a new entry for the current path with `query`; no navigation.
    fn push_query(&mut self, query: &str);
}

/// History kept in memory: the current URL plus every pushed entry.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    path: String,
    entries: Vec<String>,
}

impl MemoryHistory {
    /// Start from a path with an optional query, e.g. `/filter?q=rust`.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let path = match url.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => url.clone(),
        };
        Self {
            path,
            entries: vec![url],
        }
    }

    pub fn current_url(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or(self.path.as_str())
    }

    /// Entries pushed after construction, oldest first.
    pub fn pushed(&self) -> &[String] {
        &self.entries[1..]
    }
}

impl History for MemoryHistory {
    fn current_query(&self) -> &str {
        self.current_url()
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }

    fn push_query(&mut self, query: &str) {
        self.entries.push(format!("{}?{}", self.path, query));
    }
}
