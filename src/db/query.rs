//! Query types for listing todos.
//!
//! A [`TodoQuery`] is the storage-facing form of a list request: an equality
//! filter shared by the page fetch and the total count, plus a normalized
//! pagination window.

use super::models::Priority;

/// Page size used when the caller gives none (or a non-positive one).
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound for any page size / limit.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Equality filters; `None` means no restriction on that column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl TodoFilter {
    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.priority.is_none()
    }
}

/// Normalized pagination window.
///
/// Callers page either by page number and page size, or by limit and offset.
/// Both forms are kept so responses can echo the form the caller used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    Page { page: u64, per_page: u32 },
    Offset { limit: u32, offset: u64 },
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::Offset {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Build a window from raw caller values.
    ///
    /// Page mode is chosen as soon as `page` or `per_page` is given; otherwise
    /// `limit`/`offset` apply. Sizes fall back to the default when absent or
    /// non-positive and are capped at [`MAX_PAGE_SIZE`]. Pages start at 1 and
    /// offsets at 0.
    pub fn from_params(
        page: Option<i64>,
        per_page: Option<i64>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Self {
        if page.is_some() || per_page.is_some() {
            Pagination::Page {
                page: page.filter(|p| *p >= 1).unwrap_or(1) as u64,
                per_page: normalize_size(per_page),
            }
        } else {
            Pagination::Offset {
                limit: normalize_size(limit),
                offset: offset.filter(|o| *o > 0).unwrap_or(0) as u64,
            }
        }
    }

    /// Maximum number of rows to fetch.
    pub fn limit(&self) -> u32 {
        match *self {
            Pagination::Page { per_page, .. } => per_page,
            Pagination::Offset { limit, .. } => limit,
        }
    }

    /// Number of rows to skip, capped so it always fits SQLite's signed OFFSET.
    pub fn offset(&self) -> u64 {
        let offset = match *self {
            Pagination::Page { page, per_page } => (page - 1).saturating_mul(u64::from(per_page)),
            Pagination::Offset { offset, .. } => offset,
        };
        offset.min(i64::MAX as u64)
    }

    /// `ceil(total / page size)`.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit()))
    }
}

fn normalize_size(raw: Option<i64>) -> u32 {
    match raw {
        Some(n) if n > 0 => n.min(i64::from(MAX_PAGE_SIZE)) as u32,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Query for todos - filter + pagination.
///
/// Results are always ordered newest first, ties broken by ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub filter: TodoFilter,
    pub pagination: Pagination,
}
