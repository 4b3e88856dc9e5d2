//! Page request/response types and the page → limit/offset conversion.

use serde::{Deserialize, Serialize};

/// Page size used when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A 1-based page request. Page 0 is treated as page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Effective page number after clamping.
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Effective page size after clamping to `1..=MAX_PAGE_SIZE`.
    pub fn size(&self) -> u64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// SQL `LIMIT` / `OFFSET` pair for this page.
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self.size();
        let offset = (self.page() - 1).saturating_mul(limit);
        (limit as i64, i64::try_from(offset).unwrap_or(i64::MAX))
    }

    /// Build the response for this page given the filtered total.
    pub fn respond(&self, total: u64) -> PageResponse {
        PageResponse {
            page: self.page(),
            size: self.size(),
            total,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageResponse {
    pub page: u64,
    pub size: u64,
    /// Number of rows matching the filters, ignoring limit/offset.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(PageRequest::new(Some(1), Some(10)).limit_offset(), (10, 0));
    }

    #[test]
    fn later_pages_skip_previous_rows() {
        assert_eq!(PageRequest::new(Some(3), Some(25)).limit_offset(), (25, 50));
    }

    #[test]
    fn page_zero_is_first_page() {
        assert_eq!(PageRequest::new(Some(0), Some(10)).limit_offset(), (10, 0));
    }

    #[test]
    fn size_is_clamped() {
        assert_eq!(PageRequest::new(None, Some(0)).limit_offset(), (1, 0));
        assert_eq!(PageRequest::new(None, Some(5000)).limit_offset().0, 100);
    }

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::new(None, None);
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.limit_offset(), (DEFAULT_PAGE_SIZE as i64, 0));
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let (_, offset) = PageRequest::new(Some(u64::MAX), Some(100)).limit_offset();
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn response_echoes_effective_values() {
        let resp = PageRequest::new(Some(0), Some(500)).respond(42);
        assert_eq!(
            resp,
            PageResponse {
                page: 1,
                size: 100,
                total: 42
            }
        );
    }
}
