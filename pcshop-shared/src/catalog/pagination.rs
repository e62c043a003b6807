//! Page-number pagination
//!
//! Listings are addressed with a 1-based `?page=` query parameter. Page 1
//! always exists, even for an empty listing; any other page outside
//! `1..=total_pages`, or a value that is neither a number nor `last`, is
//! reported as [`PageError`] and surfaces as "not found".
//!
//! # Example
//!
//! ```
//! use pcshop_shared::catalog::pagination::PageWindow;
//!
//! let window = PageWindow::resolve(Some("2"), 30, 12).unwrap();
//! assert_eq!(window.offset, 12);
//! assert_eq!(window.total_pages, 3);
//! ```

use serde::Serialize;

/// Storefront listing page size
pub const STOREFRONT_PAGE_SIZE: i64 = 12;

/// Back-office product list page size
pub const ADMIN_PAGE_SIZE: i64 = 50;

/// Reasons a requested page cannot be served
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// The page parameter is not an integer (nor `last`)
    #[error("Page is not a number: {0}")]
    NotANumber(String),

    /// The page number is below 1 or past the last page
    #[error("Page {page} is out of range (1..={total_pages})")]
    OutOfRange {
        /// Requested page
        page: i64,
        /// Number of pages available
        total_pages: i64,
    },
}

/// Slice of a listing selected by a page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number
    pub page: i64,

    /// Page size
    pub per_page: i64,

    /// Rows to skip
    pub offset: i64,

    /// Total matching rows
    pub total_items: i64,

    /// Number of pages (at least 1)
    pub total_pages: i64,
}

impl PageWindow {
    /// Resolves a raw `page` parameter against a total row count
    pub fn resolve(raw: Option<&str>, total_items: i64, per_page: i64) -> Result<Self, PageError> {
        let per_page = per_page.max(1);
        let total_items = total_items.max(0);
        let total_pages = ((total_items + per_page - 1) / per_page).max(1);

        let page = match raw.map(str::trim) {
            None | Some("") => 1,
            Some("last") => total_pages,
            Some(value) => value
                .parse::<i64>()
                .map_err(|_| PageError::NotANumber(value.to_string()))?,
        };

        if page < 1 || page > total_pages {
            return Err(PageError::OutOfRange { page, total_pages });
        }

        Ok(Self {
            page,
            per_page,
            offset: (page - 1) * per_page,
            total_items,
            total_pages,
        })
    }

    /// SQL `LIMIT` for this page
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Whether a following page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether a preceding page exists
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// One page of results plus navigation metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// 1-based page number
    pub page: i64,

    /// Page size
    pub per_page: i64,

    /// Total matching rows
    pub total_items: i64,

    /// Number of pages
    pub total_pages: i64,

    /// Whether a following page exists
    pub has_next: bool,

    /// Whether a preceding page exists
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Wraps page items with the window they were fetched for
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            page: window.page,
            per_page: window.per_page,
            total_items: window.total_items,
            total_pages: window.total_pages,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_is_first() {
        let window = PageWindow::resolve(None, 30, 12).unwrap();
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit(), 12);
        assert!(window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn test_last_page() {
        let window = PageWindow::resolve(Some("last"), 30, 12).unwrap();
        assert_eq!(window.page, 3);
        assert_eq!(window.offset, 24);
        assert!(!window.has_next());
        assert!(window.has_previous());
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let window = PageWindow::resolve(Some("2"), 24, 12).unwrap();
        assert_eq!(window.total_pages, 2);
        assert!(PageWindow::resolve(Some("3"), 24, 12).is_err());
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let window = PageWindow::resolve(Some("1"), 0, 12).unwrap();
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.total_items, 0);
        assert!(!window.has_next());
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            PageWindow::resolve(Some("0"), 10, 12),
            Err(PageError::OutOfRange { page: 0, total_pages: 1 })
        );
        assert_eq!(
            PageWindow::resolve(Some("2"), 0, 12),
            Err(PageError::OutOfRange { page: 2, total_pages: 1 })
        );
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(
            PageWindow::resolve(Some("two"), 10, 12),
            Err(PageError::NotANumber("two".to_string()))
        );
    }

    #[test]
    fn test_page_sizes() {
        assert_eq!(STOREFRONT_PAGE_SIZE, 12);
        assert_eq!(ADMIN_PAGE_SIZE, 50);
    }

    #[test]
    fn test_thirteen_products_split_twelve_and_one() {
        let first = PageWindow::resolve(None, 13, STOREFRONT_PAGE_SIZE).unwrap();
        assert_eq!(first.total_pages, 2);
        assert_eq!((first.offset, first.limit()), (0, 12));
        assert!(first.has_next());

        let second = PageWindow::resolve(Some("2"), 13, STOREFRONT_PAGE_SIZE).unwrap();
        assert_eq!(second.offset, 12);
        assert_eq!(second.total_items - second.offset, 1);
        assert!(!second.has_next());
    }
}
