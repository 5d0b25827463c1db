//! Pagination metadata.

use serde::{Deserialize, Serialize};

/// Continuation state reported by one upstream batch.
///
/// Both pagination protocols reduce to this: the relay `pageInfo` object
/// and the `rel="next"` entry of a REST `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamPageInfo {
    /// Whether upstream has records after this batch.
    pub has_next_page: bool,
    /// Opaque cursor for the next batch.
    pub end_cursor: Option<String>,
}

/// Pagination state of an assembled page.
///
/// `has_previous_page` is derived from `current_page`; there is no way to set
/// it independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    current_page: u32,
    has_next_page: bool,
    has_previous_page: bool,
    #[serde(skip)]
    end_cursor: Option<String>,
}

impl PageInfo {
    /// Build page info. Pages are 1-based; `0` is treated as page 1.
    #[must_use]
    pub fn new(current_page: u32, has_next_page: bool, end_cursor: Option<String>) -> Self {
        let current_page = current_page.max(1);
        Self {
            current_page,
            has_next_page,
            has_previous_page: current_page > 1,
            end_cursor,
        }
    }

    /// The first page with nothing after it.
    #[must_use]
    pub fn first_empty() -> Self {
        Self::new(1, false, None)
    }

    /// Current 1-based page number.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Whether a preceding page exists (`current_page > 1`).
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    /// Upstream cursor after the last fetched batch, if any.
    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }
}
