//! Pagination models shared by the list endpoints.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    pub content: Vec<T>,

    /// Total records across all pages.
    pub total_elements: u64,

    /// Total number of pages.
    pub total_pages: u32,

    /// Requested page size.
    pub size: u32,

    /// Zero-based index of this page.
    pub number: u32,
}

impl<T> Page<T> {
    /// Check whether the listing has no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.total_elements == 0
    }
}

/// Sort direction accepted by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,

    /// Descending.
    Desc,
}

impl SortOrder {
    /// Wire value for the `sortOrder` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters for the paginated list endpoints.
///
/// `sort_by` and `sort_order` fall back to each endpoint's own default
/// when unset (products and customers sort by name ascending, sales by
/// creation time descending).
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Free-text search filter.
    pub search: Option<String>,

    /// Zero-based page index.
    pub page: u32,

    /// Page size.
    pub size: u32,

    /// Field to sort by.
    pub sort_by: Option<String>,

    /// Sort direction.
    pub sort_order: Option<SortOrder>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 0,
            size: 20,
            sort_by: None,
            sort_order: None,
        }
    }
}

impl ListQuery {
    /// A query for the given page with the default size and sorting.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// A query filtered by the given search text.
    #[must_use]
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }
}
