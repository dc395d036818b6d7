//! Pagination query parameters
//!
//! List endpoints accept `page` and `record_per_page` query parameters and
//! return a `total_count` alongside the requested window.

use serde::Deserialize;

const DEFAULT_RECORDS_PER_PAGE: usize = 10;

/// Query parameters for paginated list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub record_per_page: Option<usize>,
}

impl PageParams {
    /// Effective page number (1-based, minimum 1)
    pub fn page(&self) -> usize {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    /// Effective page size (minimum 1)
    pub fn record_per_page(&self) -> usize {
        self.record_per_page
            .filter(|r| *r >= 1)
            .unwrap_or(DEFAULT_RECORDS_PER_PAGE)
    }

    /// Offset of the first record in the requested window
    pub fn start_index(&self) -> usize {
        (self.page() - 1) * self.record_per_page()
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: None,
            record_per_page: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.record_per_page(), 10);
        assert_eq!(params.start_index(), 0);
    }

    #[test]
    fn test_window() {
        let params = PageParams {
            page: Some(3),
            record_per_page: Some(25),
        };
        assert_eq!(params.start_index(), 50);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let params = PageParams {
            page: Some(0),
            record_per_page: Some(0),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.record_per_page(), 10);
    }
}
