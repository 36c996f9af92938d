//! Paginator: split an ordered sequence into fixed-size pages
//!
//! Every function here borrows its input; pages are sub-slices, so computing
//! them never disturbs the sequence they came from.

use std::num::NonZeroUsize;

/// Number of pages needed for `len` items
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// All pages, in order
///
/// Concatenating the pages reproduces `items`. Only the last page may be
/// shorter than `page_size`; an empty input yields no pages.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(page_size.get()).collect()
}

/// The 1-based page `index`, or `None` when it is out of range
pub fn page<T>(items: &[T], page_size: NonZeroUsize, index: usize) -> Option<&[T]> {
    let start = index.checked_sub(1)?.checked_mul(page_size.get())?;
    if start >= items.len() {
        return None;
    }
    let end = (start + page_size.get()).min(items.len());
    Some(&items[start..end])
}

/// Clamp a requested page index into `[1, total_pages]` (1 when there are none)
pub fn clamp_page(index: usize, total_pages: usize) -> usize {
    index.clamp(1, total_pages.max(1))
}
