//! URL State Adapter
//!
//! Projects the shareable part of the search state (`query`, `tag`, `page`)
//! onto a location's query string and reads it back on mount.
//!
//! The location is never a source of truth after mount: the controller
//! writes to it through [`History::replace`] and only reads it once.

use url::form_urlencoded;
use url::Url;

use super::config::ControllerOptions;
use super::error::{Result, SearchError};

pub const PARAM_QUERY: &str = "query";
pub const PARAM_TAG: &str = "tag";
pub const PARAM_PAGE: &str = "page";

/// Serialization order of the managed parameters.
const PARAM_ORDER: [&str; 3] = [PARAM_QUERY, PARAM_TAG, PARAM_PAGE];

const DEFAULT_PAGE: u32 = 1;

/// Base used to resolve path-relative hrefs such as `/search?query=x`.
const RESOLVE_BASE: &str = "http://localhost/";

// ============================================================================
// Location & History
// ============================================================================

/// Path and raw (still encoded) query string of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Parse an absolute URL or a path-relative href. The fragment is dropped.
    pub fn parse(href: &str) -> Result<Self> {
        let base = Url::parse(RESOLVE_BASE)
            .map_err(|e| SearchError::InvalidLocation(e.to_string()))?;
        let url = base
            .join(href)
            .map_err(|e| SearchError::InvalidLocation(format!("{href}: {e}")))?;
        Ok(Self {
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// `path?query`, or just `path` when there are no parameters.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Navigation history the adapter writes to. Writes always replace the
/// current entry; nothing is ever pushed.
pub trait History: Send {
    fn location(&self) -> &Location;
    fn replace(&mut self, location: Location);
}

/// In-memory history, used by the terminal shell and tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    current: Location,
    replacements: usize,
}

impl MemoryHistory {
    pub fn new(location: Location) -> Self {
        Self {
            current: location,
            replacements: 0,
        }
    }

    pub fn from_href(href: &str) -> Result<Self> {
        Location::parse(href).map(Self::new)
    }

    /// Number of `replace` calls so far.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl History for MemoryHistory {
    fn location(&self) -> &Location {
        &self.current
    }

    fn replace(&mut self, location: Location) {
        self.replacements += 1;
        self.current = location;
    }
}

// ============================================================================
// Projected State
// ============================================================================

/// The URL projection of the search state, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlState {
    pub query: String,
    pub tag: String,
    pub page: u32,
}

/// Partial update to the URL parameters. `None` leaves a key untouched;
/// an empty string removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPatch {
    pub query: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u32>,
}

impl UrlPatch {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.tag.is_none() && self.page.is_none()
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Reads and writes [`UrlState`] against a [`History`].
#[derive(Debug, Clone)]
pub struct UrlStateAdapter {
    categories: Vec<String>,
    default_category: String,
}

impl UrlStateAdapter {
    pub fn new(options: &ControllerOptions) -> Self {
        Self {
            categories: options.categories.clone(),
            default_category: options.default_category.clone(),
        }
    }

    /// Parse the managed parameters, falling back to defaults for missing or
    /// unusable values.
    pub fn read(&self, location: &Location) -> UrlState {
        let query = first_value(location.query(), PARAM_QUERY).unwrap_or_default();

        let tag = match first_value(location.query(), PARAM_TAG) {
            Some(tag) if !tag.is_empty() && self.categories.contains(&tag) => tag,
            Some(tag) if !tag.is_empty() => {
                tracing::warn!(tag = %tag, "unknown category in URL, using default");
                self.default_category.clone()
            }
            _ => self.default_category.clone(),
        };

        let page = first_value(location.query(), PARAM_PAGE)
            .and_then(|raw| parse_page(&raw))
            .unwrap_or(DEFAULT_PAGE);

        UrlState { query, tag, page }
    }

    /// Merge `patch` into the history's current parameters and replace the
    /// current entry with the rebuilt location.
    pub fn write(&self, history: &mut dyn History, patch: &UrlPatch) {
        let current = history.location();
        let query = self.merge(current.query(), patch);
        let next = Location::new(current.path(), query);
        tracing::trace!(href = %next.href(), "replacing location");
        history.replace(next);
    }

    /// Merge `patch` into a raw query string, returning the rebuilt string in
    /// `query, tag, page` order. Parameters other than these are dropped, and
    /// a key is omitted when its value is empty or the default. Existing
    /// values [`read`](Self::read) would reject are dropped too, so the result
    /// always reads back as the state it came from.
    pub fn merge(&self, raw_query: &str, patch: &UrlPatch) -> String {
        let mut values: [Option<String>; 3] = [
            first_value(raw_query, PARAM_QUERY),
            first_value(raw_query, PARAM_TAG).filter(|tag| self.categories.contains(tag)),
            first_value(raw_query, PARAM_PAGE)
                .and_then(|raw| parse_page(&raw))
                .map(|page| page.to_string()),
        ];

        if let Some(query) = &patch.query {
            values[0] = Some(query.clone());
        }
        if let Some(tag) = &patch.tag {
            values[1] = Some(tag.clone());
        }
        if let Some(page) = patch.page {
            values[2] = Some(page.to_string());
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in PARAM_ORDER.iter().zip(values.iter()) {
            if let Some(value) = value {
                if !self.is_default(key, value) {
                    serializer.append_pair(key, value);
                }
            }
        }
        serializer.finish()
    }

    /// Full projection of `state`, as [`merge`](Self::merge) would write it
    /// over an empty query string.
    pub fn encode(&self, state: &UrlState) -> String {
        let patch = UrlPatch::default()
            .query(state.query.clone())
            .tag(state.tag.clone())
            .page(state.page);
        self.merge("", &patch)
    }

    fn is_default(&self, key: &str, value: &str) -> bool {
        value.is_empty()
            || (key == PARAM_TAG && value == self.default_category)
            || (key == PARAM_PAGE && value == DEFAULT_PAGE.to_string())
    }
}

/// A usable page number: a positive integer.
fn parse_page(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|page| *page >= DEFAULT_PAGE)
}

/// First value of `key` in an encoded query string.
fn first_value(raw_query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(raw_query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
