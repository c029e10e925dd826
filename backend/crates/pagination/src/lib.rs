//! Offset and limit pagination primitives.
//!
//! Purpose: give the domain service and its HTTP adapter one shared notion of
//! a page request and a page envelope, so `has_more` and the slice window are
//! computed the same way everywhere.
//!
//! Public surface:
//! - [`PageRequest`]: validated `limit`/`offset` pair.
//! - [`Page`]: items of one page plus the full `total` and `has_more`.
//! - [`PageRequestError`]: validation failures for page requests.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 10;
/// Offset used when a caller does not ask for one.
pub const DEFAULT_OFFSET: usize = 0;
/// Largest page size a caller may request.
pub const MAX_LIMIT: usize = 100;

/// Validation errors raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `limit` was zero.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// `limit` exceeded [`MAX_LIMIT`].
    #[error("limit must be at most {max}, got {limit}")]
    LimitTooLarge {
        /// Requested page size.
        limit: usize,
        /// Largest accepted page size.
        max: usize,
    },
}

/// Validated offset/limit window.
///
/// ## Invariants
/// - `1 <= limit <= MAX_LIMIT`.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 4).expect("valid page");
/// assert_eq!(request.window(5), 4..5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestDto")]
pub struct PageRequest {
    limit: usize,
    offset: usize,
}

impl PageRequest {
    /// Validate and construct a page request.
    pub fn new(limit: usize, offset: usize) -> Result<Self, PageRequestError> {
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { limit, offset })
    }

    /// Build a page request, substituting defaults for absent values.
    pub fn from_optional(
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Self, PageRequestError> {
        Self::new(
            limit.unwrap_or(DEFAULT_LIMIT),
            offset.unwrap_or(DEFAULT_OFFSET),
        )
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Number of items skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Index range covered by this page over a collection of `total` items.
    ///
    /// An offset at or past `total` yields an empty range; a window running
    /// past the end is truncated to the remaining items.
    #[must_use]
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        let end = start.saturating_add(self.limit).min(total);
        start..end
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

#[derive(Deserialize)]
struct PageRequestDto {
    limit: Option<usize>,
    offset: Option<usize>,
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::from_optional(value.limit, value.offset)
    }
}

/// One page of items together with the metadata needed to fetch the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total: usize,
    limit: usize,
    offset: usize,
    has_more: bool,
}

impl<T> Page<T> {
    /// Assemble a page from the items a store returned for `request`.
    ///
    /// `has_more` is true when items exist beyond the end of this page.
    #[must_use]
    pub fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        let has_more = request.offset().saturating_add(items.len()) < total;
        Self {
            items,
            total,
            limit: request.limit(),
            offset: request.offset(),
            has_more,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of items irrespective of pagination.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Page size that was requested.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Offset that was requested.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Whether more items exist after this page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Convert every item while keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.has_more,
        }
    }
}
