//! This modules defines the common functionality for paging data.
//!
//! Page numbers and page sizes arrive as raw query string values. They are
//! clamped rather than rejected: absent or non-positive values fall back to
//! the configured defaults. Only the per-spender listing rejects values that
//! are not integers at all, see [PageRequest::parse_strict].

use serde::Serialize;

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request. `None` means unbounded.
    pub max_page_size: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: None,
        }
    }
}

/// A validated, 1-based page request. Both fields are always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// Create a page request, replacing zero values with the defaults in `config`.
    pub fn new(page: u64, size: u64, config: &PaginationConfig) -> Self {
        let page = if page == 0 {
            config.default_page.max(1)
        } else {
            page
        };
        let size = if size == 0 {
            config.default_page_size.max(1)
        } else {
            size
        };
        let size = match config.max_page_size {
            Some(max_page_size) => size.min(max_page_size.max(1)),
            None => size,
        };

        Self { page, size }
    }

    /// Parse the raw `page` and `limit` query values, falling back to the
    /// defaults for anything absent, non-numeric or non-positive.
    pub fn parse_lenient(
        page: Option<&str>,
        limit: Option<&str>,
        config: &PaginationConfig,
    ) -> Self {
        let page = page.and_then(|page| page.trim().parse::<i64>().ok());
        let limit = limit.and_then(|limit| limit.trim().parse::<i64>().ok());

        Self::new(clamp_positive(page), clamp_positive(limit), config)
    }

    /// Parse the raw `page` and `limit` query values.
    ///
    /// Absent (or empty) values fall back to the defaults and non-positive
    /// values are clamped, same as [PageRequest::parse_lenient].
    ///
    /// # Errors
    /// Returns [Error::InvalidPageNumber] or [Error::InvalidPageLimit] if the
    /// corresponding value is present but is not an integer.
    pub fn parse_strict(
        page: Option<&str>,
        limit: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let page = parse_optional(page).map_err(|_| Error::InvalidPageNumber)?;
        let limit = parse_optional(limit).map_err(|_| Error::InvalidPageLimit)?;

        Ok(Self::new(clamp_positive(page), clamp_positive(limit), config))
    }

    /// The 1-based page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// The maximum number of rows on a page.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The number of rows to skip to reach the start of the page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

fn parse_optional(value: Option<&str>) -> Result<Option<i64>, std::num::ParseIntError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

/// Zero signals "use the default" to [PageRequest::new].
fn clamp_positive(value: Option<i64>) -> u64 {
    match value {
        Some(value) if value > 0 => value as u64,
        _ => 0,
    }
}

/// Pagination metadata describing a page of a filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageResult {
    /// The 1-based page number that was returned.
    pub current_page: u64,
    /// The number of pages needed to show every matching row.
    pub total_pages: u64,
    /// The page size.
    pub per_page: u64,
}

impl PageResult {
    /// Calculate the page metadata for `request` given `total_rows` matching rows.
    ///
    /// Zero matching rows gives zero total pages.
    pub fn calculate(request: PageRequest, total_rows: u64) -> Self {
        Self {
            current_page: request.page(),
            total_pages: total_rows.div_ceil(request.size()),
            per_page: request.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        pagination::{PageRequest, PageResult, PaginationConfig},
    };

    fn config() -> PaginationConfig {
        PaginationConfig::default()
    }

    #[test]
    fn non_positive_values_fall_back_to_defaults() {
        let cases = [
            (Some("0"), Some("0")),
            (Some("-1"), Some("-10")),
            (None, None),
            (Some(""), Some("")),
        ];

        for (page, limit) in cases {
            let got = PageRequest::parse_lenient(page, limit, &config());

            assert_eq!(
                (got.page(), got.size()),
                (1, 10),
                "page={page:?} limit={limit:?}"
            );
        }
    }

    #[test]
    fn lenient_parsing_ignores_non_numeric_values() {
        let got = PageRequest::parse_lenient(Some("abc"), Some("1.5"), &config());

        assert_eq!((got.page(), got.size()), (1, 10));
    }

    #[test]
    fn lenient_parsing_keeps_valid_values() {
        let got = PageRequest::parse_lenient(Some("3"), Some("25"), &config());

        assert_eq!((got.page(), got.size()), (3, 25));
        assert_eq!(got.offset(), 50);
    }

    #[test]
    fn strict_parsing_rejects_non_numeric_page() {
        let got = PageRequest::parse_strict(Some("NotInt"), Some("10"), &config());

        assert_eq!(got, Err(Error::InvalidPageNumber));
    }

    #[test]
    fn strict_parsing_rejects_non_numeric_limit() {
        let got = PageRequest::parse_strict(Some("1"), Some("NotInt"), &config());

        assert_eq!(got, Err(Error::InvalidPageLimit));
    }

    #[test]
    fn strict_parsing_clamps_non_positive_values() {
        let got = PageRequest::parse_strict(Some("0"), Some("-5"), &config()).unwrap();

        assert_eq!((got.page(), got.size()), (1, 10));
    }

    #[test]
    fn page_size_is_clamped_to_configured_maximum() {
        let config = PaginationConfig {
            max_page_size: Some(50),
            ..Default::default()
        };

        let got = PageRequest::parse_lenient(Some("1"), Some("1000000"), &config);

        assert_eq!(got.size(), 50);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        let got = PageRequest::new(u64::MAX, u64::MAX, &config());

        assert_eq!(got.offset(), u64::MAX);
    }

    #[test]
    fn total_pages_is_ceiling_of_rows_over_size() {
        let request = PageRequest::new(1, 10, &config());

        for (total_rows, want_pages) in [(0, 0), (1, 1), (10, 1), (11, 2), (20, 2), (21, 3)] {
            let got = PageResult::calculate(request, total_rows);

            assert_eq!(got.total_pages, want_pages, "total_rows={total_rows}");
            assert_eq!(got.per_page, 10);
            assert_eq!(got.current_page, 1);
        }
    }
}
