//! Paging arithmetic
//!
//! Pages are zero-based. A request for a page past the end yields an empty
//! item list, never an error.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Validated zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// Rejects `page < 0` and `size < 1`.
    pub fn new(page: i64, size: i64) -> Result<Self, ValidationError> {
        let page = u64::try_from(page)
            .map_err(|_| ValidationError::out_of_range("page", 0, i64::MAX))?;
        let size = u64::try_from(size)
            .ok()
            .filter(|s| *s >= 1)
            .ok_or_else(|| ValidationError::out_of_range("size", 1, i64::MAX))?;
        Ok(Self { page, size })
    }

    /// Build from optional wire values, falling back to page 0 and
    /// `default_size`.
    pub fn from_optional(
        page: Option<i64>,
        size: Option<i64>,
        default_size: u64,
    ) -> Result<Self, ValidationError> {
        let default_size = i64::try_from(default_size.max(1)).unwrap_or(i64::MAX);
        Self::new(page.unwrap_or(0), size.unwrap_or(default_size))
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Index of the first row on this page. Saturates instead of wrapping.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Slice one page out of an already ordered list.
    pub fn paginate<T: Clone>(&self, ordered: &[T]) -> Page<T> {
        let total = ordered.len() as u64;
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(self.size).unwrap_or(usize::MAX);
        let items = ordered
            .iter()
            .skip(start)
            .take(len)
            .cloned()
            .collect();
        Page::new(items, total, self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `ceil(total / size)`, and 0 for an empty result.
pub fn total_pages(total: u64, size: u64) -> u64 {
    if total == 0 || size == 0 {
        return 0;
    }
    total.div_ceil(size)
}

/// One page of results plus the totals of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, size: u64) -> Self {
        Self {
            items,
            total_items,
            total_pages: total_pages(total_items, size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
