//! Search Module
//!
//! URL-synchronized search over a remote catalog endpoint:
//! - `url_state`: projection of query/tag/page onto the location
//! - `client`: request/response contract and failure normalization
//! - `controller`: canonical state, intents and fetch scheduling
//! - `shell`: props and intents exchanged with the presentation layer

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod shell;
pub mod url_state;

pub use client::{FetchOutcome, HttpSearchBackend, SearchBackend, SearchClient};
pub use config::{ControllerOptions, SearchVariant};
pub use controller::{SearchController, SearchState};
pub use error::{Result, SearchError};
pub use models::{
    CategoryCounts, CategoryResults, SearchHit, SearchRequest, SearchResponse, SearchTriple,
    PAGE_SIZE,
};
pub use shell::{ResultPane, ShellIntent, ShellView};
pub use url_state::{History, Location, MemoryHistory, UrlPatch, UrlState, UrlStateAdapter};
