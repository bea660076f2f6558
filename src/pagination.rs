//! Page arithmetic for record listings: which page is current and which
//! window of page numbers is offered for navigation.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    total_count: usize,
    records_per_page: usize,
    max_visible_pages: usize,
    current_page: usize,
    start_index: usize,
}

impl Paginator {
    pub fn new(total_count: usize, records_per_page: usize, max_visible_pages: usize) -> Self {
        Self {
            total_count,
            records_per_page: records_per_page.max(1),
            max_visible_pages: max_visible_pages.max(1),
            current_page: 1,
            start_index: 1,
        }
    }

    /// Positions on a page taken from a query string; anything that is not
    /// a positive number means page 1.
    pub fn at_query(self, page: Option<&str>) -> Self {
        let page = page.and_then(|p| p.trim().parse().ok()).unwrap_or(1);
        self.at_page(page)
    }

    /// Selects `page` and centres the window on it.
    pub fn at_page(mut self, page: usize) -> Self {
        self.select(page);
        self.start_index = self
            .current_page
            .saturating_sub(self.max_visible_pages / 2)
            .max(1);
        self
    }

    /// Selects `page` without moving the window. Pages past the end select
    /// the last page.
    pub fn select(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn records_per_page(&self) -> usize {
        self.records_per_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.records_per_page)
    }

    /// Index of the first record on the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.records_per_page
    }

    pub fn visible_pages(&self) -> Vec<usize> {
        let total = self.total_pages();
        (self.start_index..self.start_index.saturating_add(self.max_visible_pages))
            .filter(|&page| page <= total)
            .collect()
    }

    pub fn can_shift_back(&self) -> bool {
        self.start_index > 1
    }

    pub fn can_shift_forward(&self) -> bool {
        self.start_index
            .saturating_add(self.max_visible_pages - 1)
            < self.total_pages()
    }

    /// Slides the window one page back, if there is room.
    pub fn shift_back(&mut self) {
        if self.can_shift_back() {
            self.start_index -= 1;
        }
    }

    /// Slides the window one page forward, if there is room.
    pub fn shift_forward(&mut self) {
        if self.can_shift_forward() {
            self.start_index += 1;
        }
    }
}
