//! Presentation contract.
//!
//! Props handed to whatever renders the search page, and the intents it
//! sends back. Renderers only read these; all state changes go through
//! [`SearchController::dispatch`](super::controller::SearchController::dispatch).

use super::models::CategoryResults;

/// User intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellIntent {
    /// The input box text changed.
    QueryChanged(String),
    /// A category button was clicked.
    TagSelected(String),
    /// A pagination button was clicked.
    PageSelected(u32),
    /// The search form was submitted.
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBoxProps<'a> {
    pub value: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySelectorProps<'a> {
    pub options: &'a [String],
    pub selected: &'a str,
}

impl CategorySelectorProps<'_> {
    /// Index of the selected option, if it is one of the options.
    pub fn selected_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o == self.selected)
    }

    /// Option after the selected one, wrapping around.
    pub fn next(&self) -> Option<&str> {
        self.cycle(1)
    }

    /// Option before the selected one, wrapping around.
    pub fn prev(&self) -> Option<&str> {
        self.cycle(self.options.len().saturating_sub(1))
    }

    fn cycle(&self, step: usize) -> Option<&str> {
        if self.options.is_empty() {
            return None;
        }
        let idx = self.selected_index().unwrap_or(0);
        Some(self.options[(idx + step) % self.options.len()].as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultListProps<'a> {
    pub results: &'a CategoryResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationProps {
    pub current_page: u32,
    /// `ceil(sum(counts) / page_size)`.
    pub total_pages: u32,
}

impl PaginationProps {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// What the results area shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultPane<'a> {
    /// Nothing searched yet.
    Hidden,
    /// A fetch is in flight; stale rows must not be shown.
    Loading,
    Results(ResultListProps<'a>),
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellView<'a> {
    pub input: InputBoxProps<'a>,
    pub categories: CategorySelectorProps<'a>,
    pub results: ResultPane<'a>,
    pub pagination: PaginationProps,
}
