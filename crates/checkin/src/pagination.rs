//! Fixed-size paging over the record set.

use asistencia_common::constants::PAGE_SIZE;

/// Cursor over a record sequence of known length.
///
/// Navigation saturates at both ends; it never wraps and never panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page_index: usize,
    page_size: usize,
    len: usize,
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            len: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `ceil(len / page_size)`, but never less than one page
    pub fn total_pages(&self) -> usize {
        self.len.div_ceil(self.page_size).max(1)
    }

    /// Whether navigation controls are worth showing
    pub fn has_multiple_pages(&self) -> bool {
        self.total_pages() > 1
    }

    /// Point the cursor at a freshly replaced record set
    pub fn replace(&mut self, len: usize) {
        self.len = len;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    /// Move to the next page; no-op on the last page
    pub fn advance(&mut self) {
        if self.page_index + 1 < self.total_pages() {
            self.page_index += 1;
        }
    }

    /// Move to the previous page; no-op on the first page
    pub fn retreat(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Jump to a page, clamped to the last one
    pub fn seek(&mut self, page_index: usize) {
        self.page_index = page_index.min(self.total_pages() - 1);
    }

    /// Slice of `items` visible on the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page_index * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}
