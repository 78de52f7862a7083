//! Fixed-size, 1-based page windows over a slice.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// The page actually returned after clamping; 0 when there are no pages.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (len + page_size - 1) / page_size
}

/// Clamps `page` into `1..=page_count`, or 0 when there is nothing to show.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    let total = page_count(len, page_size);
    if total == 0 {
        0
    } else {
        page.clamp(1, total)
    }
}

pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let total_pages = page_count(items.len(), page_size);
    let number = clamp_page(page, items.len(), page_size);

    let window = if number == 0 {
        &items[..0]
    } else {
        let start = (number - 1) * page_size;
        let end = (start + page_size).min(items.len());
        &items[start..end]
    };

    Page {
        items: window,
        number,
        total_pages,
        total_items: items.len(),
    }
}
