// ── Pagination window ──
//
// Page numbers shown under a list: the first and last page, up to two
// pages either side of the current one, and an ellipsis wherever a gap
// is skipped.

use std::fmt;

use latchkey_api::Pagination;
use serde::Serialize;

/// Pages either side of the current one.
const SPREAD: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// The page window for `current` out of `total`.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageItem> {
    let (cur, tot) = (i64::from(current), i64::from(total));
    let lo = (cur - SPREAD).max(2);
    let hi = (cur + SPREAD).min(tot - 1);

    let mut items: Vec<PageItem> = (lo..=hi)
        .filter_map(|p| u32::try_from(p).ok())
        .map(PageItem::Page)
        .collect();

    if cur - SPREAD > 2 {
        items.insert(0, PageItem::Ellipsis);
    }
    if cur + SPREAD < tot - 1 {
        items.push(PageItem::Ellipsis);
    }
    if total > 1 {
        items.insert(0, PageItem::Page(1));
        items.push(PageItem::Page(total));
    }
    items
}

/// Page position of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub per_page: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            per_page: 10,
        }
    }
}

/// Partial update; `None` fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationUpdate {
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
    pub per_page: Option<u32>,
}

impl PaginationState {
    pub fn with_per_page(per_page: u32) -> Self {
        Self {
            per_page,
            ..Self::default()
        }
    }

    pub fn update(&mut self, update: PaginationUpdate) {
        if let Some(v) = update.current_page {
            self.current_page = v;
        }
        if let Some(v) = update.total_pages {
            self.total_pages = v;
        }
        if let Some(v) = update.total_items {
            self.total_items = v;
        }
        if let Some(v) = update.per_page {
            self.per_page = v;
        }
    }

    /// Take everything a list response reported.
    pub fn apply(&mut self, pagination: &Pagination) {
        self.update(PaginationUpdate {
            current_page: Some(pagination.page),
            total_pages: Some(pagination.total_pages),
            total_items: Some(pagination.total),
            per_page: Some(pagination.per_page),
        });
    }

    pub fn visible_pages(&self) -> Vec<PageItem> {
        visible_pages(self.current_page, self.total_pages)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}
