use std::ops::Range;

use crate::query::PageLength;

/// Page size used when a protocol request does not specify one
pub const DEFAULT_PAGE_LENGTH: i64 = 10;

/// Index range of the requested page within `len` records.
///
/// A `start` past the end yields an empty range rather than an error.
#[must_use]
pub fn page_range(len: usize, start: usize, length: PageLength) -> Range<usize> {
    let start = start.min(len);
    let end = match length {
        PageLength::Limit(limit) => start.saturating_add(limit).min(len),
        PageLength::All => len,
    };
    start..end
}

/// Keep only the records of the requested page
#[must_use]
pub fn paginate<T>(mut items: Vec<T>, start: usize, length: PageLength) -> Vec<T> {
    let range = page_range(items.len(), start, length);
    items.truncate(range.end);
    items.drain(..range.start);
    items
}
