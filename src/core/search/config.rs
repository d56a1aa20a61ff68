//! Search Configuration
//!
//! Category constants and the option set that selects between the
//! commit-on-submit and live URL-sync controller policies.

use serde::{Deserialize, Serialize};

use super::error::{Result, SearchError};
use super::models::PAGE_SIZE;

// ============================================================================
// Category Constants
// ============================================================================

/// Content pages
pub const CATEGORY_PAGES: &str = "Sisulehed";
/// Events
pub const CATEGORY_EVENTS: &str = "Üritused";
/// People and contacts
pub const CATEGORY_CONTACTS: &str = "Isikud";
/// "All categories" sentinel offered by the live variant
pub const CATEGORY_ALL: &str = "Kõik";

/// The fixed content categories, in display order.
pub fn content_categories() -> Vec<String> {
    [CATEGORY_PAGES, CATEGORY_EVENTS, CATEGORY_CONTACTS]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

// ============================================================================
// Variant
// ============================================================================

/// Which controller policy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchVariant {
    /// Query is committed on submit; fetches are driven by the submitted query.
    #[default]
    Standard,
    /// Every keystroke is mirrored into the URL; offers an "all" category.
    Live,
}

// ============================================================================
// Controller Options
// ============================================================================

/// Behavioral options for [`SearchController`](super::controller::SearchController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Selectable categories in display order.
    pub categories: Vec<String>,
    /// Category used when the URL carries none.
    pub default_category: String,
    /// Mirror the draft query into the URL on every keystroke.
    pub commit_query_on_keystroke: bool,
    pub page_size: u32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::standard()
    }
}

impl ControllerOptions {
    /// Commit-on-submit over the three content categories.
    pub fn standard() -> Self {
        Self {
            categories: content_categories(),
            default_category: CATEGORY_PAGES.to_string(),
            commit_query_on_keystroke: false,
            page_size: PAGE_SIZE,
        }
    }

    /// Live URL sync with an "all" category in front of the content categories.
    pub fn live() -> Self {
        let mut categories = vec![CATEGORY_ALL.to_string()];
        categories.extend(content_categories());
        Self {
            categories,
            default_category: CATEGORY_ALL.to_string(),
            commit_query_on_keystroke: true,
            page_size: PAGE_SIZE,
        }
    }

    pub fn for_variant(variant: SearchVariant) -> Self {
        match variant {
            SearchVariant::Standard => Self::standard(),
            SearchVariant::Live => Self::live(),
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>, default_category: String) -> Self {
        self.categories = categories;
        self.default_category = default_category;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn is_known_category(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c == tag)
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(SearchError::Config("category list is empty".to_string()));
        }
        if !self.is_known_category(&self.default_category) {
            return Err(SearchError::Config(format!(
                "default category '{}' is not one of {:?}",
                self.default_category, self.categories
            )));
        }
        if self.page_size == 0 {
            return Err(SearchError::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
