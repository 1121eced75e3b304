//! Fixed-size pages over a collection held entirely in memory.

use std::ops::Range;

pub const CATALOG_PAGE_SIZE: usize = 12;
pub const EMPLOYEE_PAGE_SIZE: usize = 10;

/// Zero-based page cursor.
///
/// The stored page is only a request; every read clamps it to
/// `[0, page_count - 1]` for the collection at hand, so moving past either
/// end is a no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    page: usize,
}

impl Paginator {
    /// A `page_size` of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero for an empty collection.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    pub fn last_page(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// The page that would be displayed for `total` items.
    pub fn current_page(&self, total: usize) -> usize {
        self.page.min(self.last_page(total))
    }

    /// Moves to `page`, clamped. Returns the page now current.
    pub fn go_to(&mut self, page: usize, total: usize) -> usize {
        self.page = page.min(self.last_page(total));
        self.page
    }

    pub fn next(&mut self, total: usize) -> usize {
        let current = self.current_page(total);
        self.go_to(current.saturating_add(1), total)
    }

    pub fn prev(&mut self, total: usize) -> usize {
        let current = self.current_page(total);
        self.go_to(current.saturating_sub(1), total)
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    pub fn has_prev(&self, total: usize) -> bool {
        self.current_page(total) > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.current_page(total) < self.last_page(total)
    }

    /// Index range of the current page within a collection of `total`.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.current_page(total) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}
