/// Catalog Search - URL-synchronized search controller
///
/// Core library for querying a multi-category content catalog (pages,
/// events, contacts), filtering by category and paging through results,
/// with the search state mirrored into the page URL.

pub mod config;
pub mod core;
pub mod tui;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
