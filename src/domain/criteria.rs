//! Filter criteria shared by the search endpoint and the filter form.

use std::num::NonZeroU32;

/// Keyword, category, tag set and page number of one search.
///
/// Criteria are transient: they are rebuilt from the request (or the page URL)
/// on every user action and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub keyword: String,
    /// Category slug; empty means no category restriction.
    pub category: String,
    /// Selected tag slugs in selection order.
    pub tags: Vec<String>,
    pub page: NonZeroU32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            category: String::new(),
            tags: Vec::new(),
            page: NonZeroU32::MIN,
        }
    }
}

impl FilterCriteria {
    pub fn with_page(self, page: NonZeroU32) -> Self {
        Self { page, ..self }
    }

    /// Whitespace separated keyword terms; every term must match.
    pub fn keyword_terms(&self) -> Vec<String> {
        self.keyword
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn category_filter(&self) -> Option<&str> {
        (!self.category.is_empty()).then_some(self.category.as_str())
    }

    /// Tags joined for the endpoint's comma separated `tags` parameter.
    pub fn tags_param(&self) -> String {
        self.tags.join(",")
    }

    /// Criteria built from the raw endpoint parameters.
    ///
    /// Absent parameters mean "no filter on that dimension"; a malformed page
    /// falls back to the first page.
    pub fn from_endpoint_params(
        keyword: Option<&str>,
        category: Option<&str>,
        tags: Option<&str>,
        page: Option<&str>,
    ) -> Self {
        Self {
            keyword: keyword.unwrap_or_default().to_string(),
            category: category.unwrap_or_default().to_string(),
            tags: tags.map(split_tag_list).unwrap_or_default(),
            page: parse_page(page),
        }
    }
}

/// Parse a positive page number, falling back to page 1.
pub fn parse_page(raw: Option<&str>) -> NonZeroU32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN)
}

/// Split a comma separated slug list, dropping empty entries.
pub fn split_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .collect()
}
