//! Search State Controller
//!
//! Owns the canonical search state and decides when to fetch. User intents
//! mutate local state, commit the change to the URL, then run the triple
//! observer, which issues at most one fetch per distinct
//! (submitted query, tag, page).
//!
//! Fetches run on the tokio runtime and report back over an unbounded
//! channel. Every fetch carries a sequence number and only the most recently
//! issued one is applied, so a slow response for an old triple can never
//! overwrite a newer one.

use tokio::sync::mpsc;

use super::client::{FetchOutcome, SearchClient};
use super::config::ControllerOptions;
use super::error::Result;
use super::models::{CategoryCounts, CategoryResults, SearchTriple};
use super::shell::{
    CategorySelectorProps, InputBoxProps, PaginationProps, ResultListProps, ResultPane, ShellIntent,
    ShellView,
};
use super::url_state::{History, Location, UrlPatch, UrlStateAdapter};

// ============================================================================
// State
// ============================================================================

/// Canonical in-memory search state.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Text currently typed, not yet committed.
    pub draft_query: String,
    /// Last committed query; drives fetching.
    pub submitted_query: String,
    pub selected_tag: String,
    /// Always `>= 1`.
    pub page: u32,
    /// True while the latest fetch is outstanding.
    pub loading: bool,
    /// Distinguishes "never searched" from "searched, zero results".
    pub has_searched_once: bool,
    pub results: CategoryResults,
    pub counts: CategoryCounts,
}

impl SearchState {
    pub fn triple(&self) -> SearchTriple {
        SearchTriple::new(self.submitted_query.clone(), self.selected_tag.clone(), self.page)
    }

    fn clear_results(&mut self) {
        self.results = CategoryResults::default();
        self.counts = CategoryCounts::default();
    }
}

/// A finished fetch, tagged with the sequence number it was issued under.
#[derive(Debug)]
struct Completion {
    seq: u64,
    triple: SearchTriple,
    outcome: FetchOutcome,
}

// ============================================================================
// Controller
// ============================================================================

pub struct SearchController<H: History> {
    options: ControllerOptions,
    adapter: UrlStateAdapter,
    history: H,
    client: SearchClient,
    state: SearchState,

    /// Triple of the most recent fetch (or no-query reset).
    last_requested: Option<SearchTriple>,
    /// Sequence number of the most recent fetch (or no-query reset).
    latest_seq: u64,
    /// Fetches spawned but not yet received, stale ones included.
    outstanding: usize,
    fetch_count: u64,
    last_failure: Option<String>,

    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<H: History> SearchController<H> {
    /// Seed state from the history's current location and run the triple
    /// observer once. A seeded query is fetched immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(options: ControllerOptions, history: H, client: SearchClient) -> Result<Self> {
        options.validate()?;
        let adapter = UrlStateAdapter::new(&options);
        let seeded = adapter.read(history.location());
        let query = seeded.query.trim().to_string();

        tracing::debug!(
            query = %query,
            tag = %seeded.tag,
            page = seeded.page,
            "mounting search controller"
        );

        let state = SearchState {
            draft_query: query.clone(),
            has_searched_once: !query.is_empty(),
            submitted_query: query,
            selected_tag: seeded.tag,
            page: seeded.page,
            loading: false,
            results: CategoryResults::default(),
            counts: CategoryCounts::default(),
        };

        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            options,
            adapter,
            history,
            client,
            state,
            last_requested: None,
            latest_seq: 0,
            outstanding: 0,
            fetch_count: 0,
            last_failure: None,
            completion_tx,
            completion_rx,
        };
        controller.on_triple_changed();
        Ok(controller)
    }

    // ========================================================================
    // Intents
    // ========================================================================

    pub fn dispatch(&mut self, intent: ShellIntent) {
        match intent {
            ShellIntent::QueryChanged(term) => self.on_query_text_change(term),
            ShellIntent::TagSelected(tag) => self.on_tag_change(tag),
            ShellIntent::PageSelected(page) => self.on_page_change(page),
            ShellIntent::Submit => self.on_submit(),
        }
    }

    /// Update the draft. Only mirrored into the URL in live mode; never fetches.
    pub fn on_query_text_change(&mut self, term: impl Into<String>) {
        self.state.draft_query = term.into();
        if self.options.commit_query_on_keystroke {
            let patch = UrlPatch::default().query(self.state.draft_query.clone());
            self.commit(&patch);
        }
    }

    /// Select a category and go back to the first page.
    pub fn on_tag_change(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.options.is_known_category(&tag) {
            tracing::warn!(tag = %tag, "ignoring unknown category");
            return;
        }
        self.state.selected_tag = tag;
        self.state.page = 1;
        let patch = UrlPatch::default()
            .tag(self.state.selected_tag.clone())
            .page(1);
        self.commit(&patch);
        self.on_triple_changed();
    }

    /// Move to `page`. Only clamped to `>= 1`; the caller keeps it in range.
    pub fn on_page_change(&mut self, page: u32) {
        self.state.page = page.max(1);
        self.commit(&UrlPatch::default().page(self.state.page));
        self.on_triple_changed();
    }

    /// Commit the trimmed draft. Ignored when it equals the submitted query.
    pub fn on_submit(&mut self) {
        let query = self.state.draft_query.trim().to_string();
        if query == self.state.submitted_query {
            tracing::debug!(query = %query, "submit ignored, query unchanged");
            return;
        }

        self.state.submitted_query = query;
        self.state.page = 1;
        self.state.has_searched_once = true;
        let patch = UrlPatch::default()
            .query(self.state.submitted_query.clone())
            .tag(self.state.selected_tag.clone())
            .page(1);
        self.commit(&patch);
        self.on_triple_changed();
    }

    fn commit(&mut self, patch: &UrlPatch) {
        self.adapter.write(&mut self.history, patch);
    }

    // ========================================================================
    // Fetch Lifecycle
    // ========================================================================

    /// Observer for the (submitted query, tag, page) triple. Issues one fetch
    /// when the triple differs from the last requested one, or resets to the
    /// empty state when there is no query.
    fn on_triple_changed(&mut self) {
        let triple = self.state.triple();
        if self.last_requested.as_ref() == Some(&triple) {
            return;
        }
        self.last_requested = Some(triple.clone());
        self.latest_seq += 1;
        let seq = self.latest_seq;

        if !triple.has_query() {
            tracing::debug!(seq, "no query, resetting results");
            self.state.clear_results();
            self.state.loading = false;
            self.last_failure = None;
            return;
        }

        tracing::debug!(
            seq,
            query = %triple.query,
            tag = %triple.tag,
            page = triple.page,
            "issuing search"
        );
        self.state.loading = true;
        self.last_failure = None;
        self.outstanding += 1;
        self.fetch_count += 1;

        let client = self.client.clone();
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let outcome = client.fetch(&triple).await;
            // Receiver lives as long as the controller; a send error only
            // means the controller was dropped mid-flight.
            let _ = tx.send(Completion {
                seq,
                triple,
                outcome,
            });
        });
    }

    fn apply(&mut self, completion: Completion) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if completion.seq != self.latest_seq {
            tracing::debug!(
                seq = completion.seq,
                latest = self.latest_seq,
                page = completion.triple.page,
                "discarding stale search response"
            );
            return;
        }

        self.last_failure = completion.outcome.failure().map(str::to_string);
        let (results, counts) = completion.outcome.into_parts();
        self.state.results = results;
        self.state.counts = counts;
        self.state.loading = false;
    }

    /// Apply every completion that has already arrived. Never blocks.
    /// Returns whether anything was received.
    pub fn poll(&mut self) -> bool {
        let mut received = false;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            received = true;
        }
        received
    }

    /// Wait until the latest fetch has been applied.
    pub async fn wait_idle(&mut self) {
        self.poll();
        while self.state.loading {
            match self.completion_rx.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn location(&self) -> &Location {
        self.history.location()
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn total_pages(&self) -> u32 {
        self.state.counts.total_pages(self.options.page_size)
    }

    /// Number of fetches issued since mount.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count
    }

    /// Fetches spawned but not yet received, including superseded ones.
    pub fn outstanding_fetches(&self) -> usize {
        self.outstanding
    }

    /// Reason the currently displayed (empty) result came from a failure.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Presentation props for the current state.
    pub fn view(&self) -> ShellView<'_> {
        let results = if self.state.loading {
            ResultPane::Loading
        } else if self.state.has_searched_once {
            ResultPane::Results(ResultListProps {
                results: &self.state.results,
            })
        } else {
            ResultPane::Hidden
        };

        ShellView {
            input: InputBoxProps {
                value: &self.state.draft_query,
            },
            categories: CategorySelectorProps {
                options: &self.options.categories,
                selected: &self.state.selected_tag,
            },
            results,
            pagination: PaginationProps {
                current_page: self.state.page,
                total_pages: self.total_pages(),
            },
        }
    }
}
