//! Pagination types for list payloads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Rejected pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Pages are numbered from 1.
    #[error("page must be at least 1")]
    ZeroPage,

    /// Empty pages cannot be requested.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// Page size above the configured maximum.
    #[error("page size {size} exceeds maximum {max}")]
    PageSizeTooLarge {
        /// Requested page size.
        size: u32,
        /// Configured maximum.
        max: u32,
    },
}

impl PageRequest {
    /// Creates a new page request.
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Checks the parameters against a maximum page size.
    pub fn validate(&self, max_page_size: u32) -> Result<(), PaginationError> {
        if self.page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if self.page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        if self.page_size > max_page_size {
            return Err(PaginationError::PageSizeTooLarge {
                size: self.page_size,
                max: max_page_size,
            });
        }
        Ok(())
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns the page size as a query limit.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Response wrapper for paginated data.
///
/// Serializes flat: `{data, page, pageSize, totalCount, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_count: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_previous_page: bool,
}

impl PageMeta {
    /// Computes metadata for `total_count` items split by `request`.
    #[must_use]
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        let total_pages = if total_count == 0 || request.page_size == 0 {
            1
        } else {
            let pages = total_count.div_ceil(u64::from(request.page_size));
            u32::try_from(pages).unwrap_or(u32::MAX)
        };

        Self {
            page: request.page,
            page_size: request.page_size,
            total_count,
            total_pages,
            has_next_page: request.page < total_pages,
            has_previous_page: request.page > 1,
        }
    }
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response from an already-sliced page.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total_count),
        }
    }

    /// Slices the page described by `request` out of the complete item list.
    ///
    /// A page past the end yields empty `data` with accurate metadata.
    #[must_use]
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let total_count = items.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let data = items.into_iter().skip(offset).take(limit).collect();
        Self::new(data, request, total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 20);
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(2, 20).offset(), 20);
        assert_eq!(PageRequest::new(3, 7).offset(), 14);
    }

    #[test]
    fn test_page_request_validate() {
        assert_eq!(PageRequest::new(1, 20).validate(200), Ok(()));
        assert_eq!(
            PageRequest::new(0, 20).validate(200),
            Err(PaginationError::ZeroPage)
        );
        assert_eq!(
            PageRequest::new(1, 0).validate(200),
            Err(PaginationError::ZeroPageSize)
        );
        assert_eq!(
            PageRequest::new(1, 201).validate(200),
            Err(PaginationError::PageSizeTooLarge { size: 201, max: 200 })
        );
    }

    #[test]
    fn test_page_meta_flags() {
        // 25 items, 10 per page -> 3 pages
        let first = PageMeta::new(PageRequest::new(1, 10), 25);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);

        let last = PageMeta::new(PageRequest::new(3, 10), 25);
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);
    }

    #[test]
    fn test_page_meta_empty() {
        let meta = PageMeta::new(PageRequest::new(1, 10), 0);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_paginate_slices_items() {
        let items: Vec<u32> = (1..=25).collect();

        let page = PageResponse::paginate(items.clone(), PageRequest::new(3, 10));
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.meta.total_count, 25);

        let past_end = PageResponse::paginate(items, PageRequest::new(4, 10));
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.meta.total_pages, 3);
        assert!(!past_end.meta.has_next_page);
    }

    #[test]
    fn test_page_response_serializes_flat() {
        let page = PageResponse::paginate(vec![1, 2, 3], PageRequest::new(1, 2));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["hasNextPage"], true);
        assert_eq!(json["hasPreviousPage"], false);
    }
}
