//! Search Request/Response Models
//!
//! Wire types for the search endpoint and the normalized result sets the
//! controller keeps between fetches.

use serde::{Deserialize, Serialize};

/// Number of results per page, used to derive the total page count.
pub const PAGE_SIZE: u32 = 10;

/// A single result row. Rows are opaque to the controller; only the
/// presentation layer looks inside them.
pub type SearchHit = serde_json::Value;

// ============================================================================
// Triple
// ============================================================================

/// The (submitted query, selected category, page) key that uniquely
/// determines a search request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTriple {
    pub query: String,
    pub tag: String,
    pub page: u32,
}

impl SearchTriple {
    pub fn new(query: impl Into<String>, tag: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            tag: tag.into(),
            page,
        }
    }

    /// Whether there is anything to search for.
    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            search_string: self.query.clone(),
            tag: self.tag.clone(),
            page: self.page,
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search_string: String,
    pub tag: String,
    pub page: u32,
}

/// Response of `POST /api/search`.
///
/// Successful responses carry `data` and `count`; failed ones carry `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CategoryResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<CategoryCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn ok(data: CategoryResults, count: CategoryCounts) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: Some(count),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// Result Sets
// ============================================================================

/// Last-fetched result rows, one ordered sequence per content category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryResults {
    #[serde(default)]
    pub pages: Vec<SearchHit>,
    #[serde(default)]
    pub events: Vec<SearchHit>,
    #[serde(default)]
    pub contacts: Vec<SearchHit>,
}

impl CategoryResults {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.events.is_empty() && self.contacts.is_empty()
    }

    /// Number of rows across all categories.
    pub fn len(&self) -> usize {
        self.pages.len() + self.events.len() + self.contacts.len()
    }
}

/// Total match counts per category, across all pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub events: u64,
    #[serde(default)]
    pub contacts: u64,
}

impl CategoryCounts {
    pub fn new(pages: u64, events: u64, contacts: u64) -> Self {
        Self {
            pages,
            events,
            contacts,
        }
    }

    pub fn total(&self) -> u64 {
        self.pages
            .saturating_add(self.events)
            .saturating_add(self.contacts)
    }

    /// `ceil(total / page_size)`; zero when there is nothing to page through.
    pub fn total_pages(&self, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        let pages = self.total().div_ceil(u64::from(page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
