use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miette::IntoDiagnostic;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use catalog_search::config::AppConfig;
use catalog_search::core::logging;
use catalog_search::core::search::{MemoryHistory, SearchClient, SearchController};
use catalog_search::tui::app::SearchApp;

/// Location used when none is given on the command line.
const DEFAULT_LOCATION: &str = "/search";

#[tokio::main]
async fn main() -> miette::Result<()> {
    let loaded = AppConfig::load();
    let config = &loaded.config;

    // Initialize logging, then report how the config was resolved
    let _log_guard = logging::init_tui(config.log_dir(), &config.logging.level);
    log::info!("{} v{} starting", catalog_search::NAME, catalog_search::VERSION);
    loaded.report();

    let href = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let history = MemoryHistory::from_href(&href)?;

    let settings = &config.search;
    let client = SearchClient::http(
        &settings.base_url,
        &settings.endpoint_path,
        settings.request_timeout(),
    )?;
    let controller = SearchController::mount(settings.controller_options(), history, client)?;

    // Sender kept alive so the app's event channel never closes.
    let (_event_tx, event_rx) = mpsc::unbounded_channel();
    let mut app = SearchApp::new(controller, event_rx);

    // Setup terminal
    enable_raw_mode().into_diagnostic()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).into_diagnostic()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).into_diagnostic()?;

    // Run the app
    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms.max(1)))
        .await;

    // Restore terminal
    disable_raw_mode().into_diagnostic()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).into_diagnostic()?;
    terminal.show_cursor().into_diagnostic()?;

    result.into_diagnostic()?;

    let final_href = app.controller().location().href();
    log::info!("Exiting at {final_href}");
    println!("{final_href}");
    Ok(())
}
