use std::ops::Range;

/// Fixed number of rows per list page
pub const PAGE_SIZE: usize = 10;

/// Cursor over a list of `total_items` split into fixed-size pages
///
/// Pages are 1-based. With no items there are zero pages and the cursor
/// stays on page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl Pager {
    pub fn new(total_items: usize) -> Self {
        Self::with_page_size(total_items, PAGE_SIZE)
    }

    pub fn with_page_size(total_items: usize, page_size: usize) -> Self {
        Pager {
            current_page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    /// `ceil(total_items / page_size)`; zero when there are no items
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[cfg(test)]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Jump to `page`, clamped into `[1, total_pages]`
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages().max(1));
        self.current_page
    }

    /// Keep the cursor but re-clamp after the item count changed
    pub fn resize(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.go_to(self.current_page);
    }

    /// Move to next page
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            false
        } else {
            self.current_page += 1;
            true
        }
    }

    /// Move to previous page
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            false
        } else {
            self.current_page -= 1;
            true
        }
    }

    pub fn is_first(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page >= self.total_pages()
    }

    /// Index range of the current page, `[(n-1)*size, n*size)` cut to the item count
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// "Showing 11-20 of 25"
    pub fn summary(&self, noun: &str) -> String {
        let range = self.range();
        let first = if range.is_empty() { 0 } else { range.start + 1 };
        format!("Showing {}-{} of {} {}", first, range.end, self.total_items, noun)
    }
}
