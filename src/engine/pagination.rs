//! Fixed-size pagination.

use std::ops::Range;

/// Current page (1-based) and the fixed page size.
///
/// Page arithmetic never fails: there is always at least one page, requests
/// outside `[1, total_pages]` are clamped, and slice bounds are capped at the
/// collection length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
}

impl PageState {
    /// Creates page state positioned on page 1. A zero `page_size` is raised
    /// to 1; configuration validation rejects it before this point.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(total_count / page_size)`, at least 1.
    #[must_use]
    pub const fn total_pages(&self, total_count: usize) -> usize {
        let pages = total_count / self.page_size + (total_count % self.page_size != 0) as usize;
        if pages == 0 {
            1
        } else {
            pages
        }
    }

    /// Moves to `page`, clamped to `[1, total_pages]`. Returns the page landed on.
    pub fn set_page(&mut self, page: usize, total_count: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages(total_count));
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    #[must_use]
    pub const fn is_out_of_range(&self, total_count: usize) -> bool {
        self.current_page > self.total_pages(total_count)
    }

    /// Index range of the current page within a collection of `total_count`.
    /// Empty when the page lies past the end.
    #[must_use]
    pub fn bounds(&self, total_count: usize) -> Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(total_count);
        let end = self
            .current_page
            .saturating_mul(self.page_size)
            .min(total_count);
        start..end
    }

    /// 1-based `(first, last)` row numbers shown on the current page.
    #[must_use]
    pub fn row_range(&self, total_count: usize) -> Option<(usize, usize)> {
        let bounds = self.bounds(total_count);
        if bounds.is_empty() {
            None
        } else {
            Some((bounds.start + 1, bounds.end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up_with_floor_of_one() {
        let page = PageState::new(2);
        assert_eq!(page.total_pages(0), 1);
        assert_eq!(page.total_pages(4), 2);
        assert_eq!(page.total_pages(5), 3);
    }

    #[test]
    fn set_page_clamps_both_ends() {
        let mut page = PageState::new(2);
        assert_eq!(page.set_page(10, 5), 3);
        assert_eq!(page.set_page(0, 5), 1);
        assert_eq!(page.set_page(2, 0), 1);
    }

    #[test]
    fn bounds_cap_at_collection_end() {
        let mut page = PageState::new(2);
        page.set_page(3, 5);
        assert_eq!(page.bounds(5), 4..5);
        assert_eq!(page.row_range(5), Some((5, 5)));

        // collection shrank underneath the page
        assert_eq!(page.bounds(1), 1..1);
        assert!(page.is_out_of_range(1));
        assert_eq!(page.row_range(1), None);
    }

    #[test]
    fn zero_page_size_is_raised() {
        assert_eq!(PageState::new(0).page_size(), 1);
    }
}
