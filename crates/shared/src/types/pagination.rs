//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from((self.page.saturating_sub(1)) * self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page.max(1)))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }

    #[rstest]
    #[case(1, 20, 0)]
    #[case(3, 25, 50)]
    #[case(2, 1, 1)]
    // Page 0 is clamped to the first page.
    #[case(0, 20, 0)]
    fn test_page_request_offset(#[case] page: u32, #[case] per_page: u32, #[case] expected: u64) {
        let request = PageRequest { page, per_page };
        assert_eq!(request.offset(), expected);
        assert_eq!(request.limit(), u64::from(per_page));
    }

    #[rstest]
    #[case(41, 20, 3)]
    #[case(40, 20, 2)]
    #[case(1, 20, 1)]
    #[case(0, 20, 1)]
    fn test_page_response_total_pages(
        #[case] total: u64,
        #[case] per_page: u32,
        #[case] expected: u32,
    ) {
        let response: PageResponse<i32> = PageResponse::new(vec![], 1, per_page, total);
        assert_eq!(response.meta.total_pages, expected);
        assert_eq!(response.meta.total, total);
    }
}
