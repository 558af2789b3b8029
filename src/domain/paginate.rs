// src/domain/paginate.rs

use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based.
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageState {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index: page_index.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Called whenever the filter or sort state changes.
    pub fn reset(&mut self) {
        self.page_index = 1;
    }

    /// `page` and `pageSize`; invalid or missing values fall back to page 1 / `default_size`.
    pub fn from_params(params: &HashMap<String, String>, default_size: usize) -> Self {
        let num = |key: &str| params.get(key).and_then(|v| v.trim().parse::<usize>().ok());
        Self::new(
            num("page").unwrap_or(1),
            num("pageSize").unwrap_or(default_size),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page_index: usize,
    pub page_size: usize,
    /// Offset of the first item of this page.
    pub start_index: usize,
    /// Exclusive, clamped to `total_items`.
    pub end_index: usize,
}

/// The page description returned by the search API next to the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: usize,
    pub total_pages: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl<T> Page<T> {
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            total_items: self.total_items,
            total_pages: self.total_pages,
            page_index: self.page_index,
            page_size: self.page_size,
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page_index: self.page_index,
            page_size: self.page_size,
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Slices one page out of an already ordered sequence.
/// Pages past the end are empty rather than an error; callers clamp if they care.
pub fn paginate<T: Clone>(ordered: &[T], page_index: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let page_index = page_index.max(1);
    let total_items = ordered.len();

    let start_index = (page_index - 1).saturating_mul(page_size);
    let end_index = start_index.saturating_add(page_size).min(total_items);
    let items = if start_index >= total_items {
        Vec::new()
    } else {
        ordered[start_index..end_index].to_vec()
    };

    Page {
        items,
        total_items,
        total_pages: total_pages(total_items, page_size),
        page_index,
        page_size,
        start_index,
        end_index,
    }
}
