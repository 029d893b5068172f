//! Offset pagination helpers for the fixed-size search pages.

use std::num::NonZeroU32;

/// Posts per search page.
pub const PAGE_SIZE: u32 = 5;

/// Number of pages needed for `count` matches, rounding up.
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = count.div_ceil(page_size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Rows to skip before `page`.
pub fn page_offset(page: NonZeroU32, page_size: u32) -> u64 {
    u64::from(page.get() - 1) * u64::from(page_size)
}
