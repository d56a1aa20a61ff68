//! Search Controller Scenario Tests

use std::sync::Arc;

use crate::core::search::config::ControllerOptions;
use crate::core::search::controller::SearchController;
use crate::core::search::models::{CategoryCounts, SearchRequest, SearchResponse};
use crate::core::search::shell::{ResultPane, ShellIntent};
use crate::core::search::url_state::MemoryHistory;
use crate::tests::mocks::{client, counted_response, pages_response, GatedBackend, RecordingBackend};

// ============================================================================
// Helpers
// ============================================================================

fn mount(
    href: &str,
    options: ControllerOptions,
    backend: Arc<RecordingBackend>,
) -> SearchController<MemoryHistory> {
    let history = MemoryHistory::from_href(href).unwrap();
    SearchController::mount(options, history, client(backend)).unwrap()
}

fn request(query: &str, tag: &str, page: u32) -> SearchRequest {
    SearchRequest {
        search_string: query.to_string(),
        tag: tag.to_string(),
        page,
    }
}

/// Drain every outstanding fetch, including superseded ones.
async fn drain(controller: &mut SearchController<MemoryHistory>) {
    while controller.outstanding_fetches() > 0 {
        tokio::task::yield_now().await;
        controller.poll();
    }
}

// ============================================================================
// Mount
// ============================================================================

#[tokio::test]
async fn test_mount_seeds_state_and_fetches_once() {
    let backend = RecordingBackend::replying(pages_response("kool", 2));
    let mut controller = mount(
        "/search?query=kool&tag=%C3%9Critused&page=2",
        ControllerOptions::standard(),
        backend.clone(),
    );

    let state = controller.state();
    assert_eq!(state.draft_query, "kool");
    assert_eq!(state.submitted_query, "kool");
    assert_eq!(state.selected_tag, "Üritused");
    assert_eq!(state.page, 2);
    assert!(state.loading);
    assert!(state.has_searched_once);
    assert_eq!(controller.view().results, ResultPane::Loading);

    controller.wait_idle().await;

    assert_eq!(backend.requests(), vec![request("kool", "Üritused", 2)]);
    assert_eq!(controller.fetch_count(), 1);
    assert!(!controller.is_loading());
    assert_eq!(controller.state().results.len(), 2);
    // Mount reads the URL but never writes it.
    assert_eq!(controller.history().replacements(), 0);
}

#[tokio::test]
async fn test_mount_without_query_stays_idle() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let controller = mount("/search", ControllerOptions::standard(), backend.clone());

    assert_eq!(controller.fetch_count(), 0);
    assert!(!controller.is_loading());
    assert!(!controller.state().has_searched_once);
    assert_eq!(controller.view().results, ResultPane::Hidden);
    assert_eq!(controller.total_pages(), 0);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_mount_trims_seeded_query() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?query=+kool+",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;

    assert_eq!(controller.state().submitted_query, "kool");
    assert_eq!(backend.requests(), vec![request("kool", "Sisulehed", 1)]);
}

#[tokio::test]
async fn test_mount_rejects_invalid_options() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let options =
        ControllerOptions::standard().with_categories(vec!["A".into()], "B".to_string());
    let history = MemoryHistory::from_href("/search").unwrap();
    assert!(SearchController::mount(options, history, client(backend)).is_err());
}

// ============================================================================
// Submit
// ============================================================================

#[tokio::test]
async fn test_double_submit_fetches_once() {
    let backend = RecordingBackend::replying(pages_response("kool", 3));
    let mut controller = mount("/search", ControllerOptions::standard(), backend.clone());

    controller.dispatch(ShellIntent::QueryChanged("kool".into()));
    controller.dispatch(ShellIntent::Submit);
    controller.dispatch(ShellIntent::Submit);
    controller.wait_idle().await;

    assert_eq!(controller.fetch_count(), 1);
    assert_eq!(backend.requests(), vec![request("kool", "Sisulehed", 1)]);

    // Surrounding whitespace does not make it a new query.
    controller.on_query_text_change("  kool ");
    controller.on_submit();
    assert_eq!(controller.fetch_count(), 1);
}

#[tokio::test]
async fn test_typing_alone_never_fetches() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount("/search", ControllerOptions::standard(), backend.clone());

    for draft in ["k", "ko", "koo", "kool"] {
        controller.on_query_text_change(draft);
    }

    assert_eq!(controller.fetch_count(), 0);
    assert_eq!(controller.state().draft_query, "kool");
    assert_eq!(controller.state().submitted_query, "");
    assert_eq!(controller.location().href(), "/search");
}

#[tokio::test]
async fn test_submit_resets_page_and_orders_url() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?utm_source=uudiskiri&page=4&tag=Isikud",
        ControllerOptions::standard(),
        backend.clone(),
    );
    assert_eq!(controller.state().page, 4);

    controller.on_query_text_change("kool");
    controller.on_submit();
    controller.wait_idle().await;

    assert_eq!(controller.state().page, 1);
    assert_eq!(controller.location().href(), "/search?query=kool&tag=Isikud");
    assert_eq!(controller.history().replacements(), 1);
    assert_eq!(backend.requests(), vec![request("kool", "Isikud", 1)]);
}

#[tokio::test]
async fn test_submitting_empty_query_clears_results() {
    let backend = RecordingBackend::replying(pages_response("kool", 3));
    let mut controller = mount(
        "/search?query=kool",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;
    assert_eq!(controller.state().results.len(), 3);

    controller.on_query_text_change("   ");
    controller.on_submit();

    assert_eq!(controller.fetch_count(), 1);
    assert!(!controller.is_loading());
    assert!(controller.state().results.is_empty());
    assert_eq!(controller.state().counts, CategoryCounts::default());
    assert_eq!(controller.location().href(), "/search");
    // Already searched once, so the empty state is shown rather than hidden.
    assert!(matches!(controller.view().results, ResultPane::Results(_)));
}

#[tokio::test]
async fn test_empty_submit_before_any_search_is_ignored() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount("/search", ControllerOptions::standard(), backend.clone());

    controller.on_submit();

    assert_eq!(controller.fetch_count(), 0);
    assert!(!controller.state().has_searched_once);
    assert_eq!(controller.view().results, ResultPane::Hidden);
    assert_eq!(controller.history().replacements(), 0);
}

// ============================================================================
// Tag & Page
// ============================================================================

#[tokio::test]
async fn test_tag_change_resets_page() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?query=kool&page=3",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;

    controller.dispatch(ShellIntent::TagSelected("Isikud".into()));
    controller.wait_idle().await;

    assert_eq!(controller.state().page, 1);
    assert_eq!(controller.state().selected_tag, "Isikud");
    assert_eq!(
        backend.requests(),
        vec![request("kool", "Sisulehed", 3), request("kool", "Isikud", 1)]
    );
    assert_eq!(controller.location().href(), "/search?query=kool&tag=Isikud");
}

#[tokio::test]
async fn test_unknown_tag_is_ignored() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?query=kool",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;

    controller.on_tag_change("Uudised");

    assert_eq!(controller.state().selected_tag, "Sisulehed");
    assert_eq!(controller.fetch_count(), 1);
    assert_eq!(controller.history().replacements(), 0);
}

#[tokio::test]
async fn test_tag_change_without_query_updates_url_only() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount("/search", ControllerOptions::standard(), backend.clone());

    controller.on_tag_change("Üritused");

    assert_eq!(controller.fetch_count(), 0);
    assert_eq!(controller.location().href(), "/search?tag=%C3%9Critused");
}

#[tokio::test]
async fn test_rejected_url_tag_is_not_written_back() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?query=kool&tag=Muu",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;
    assert_eq!(controller.state().selected_tag, "Sisulehed");

    controller.on_page_change(2);
    controller.wait_idle().await;

    assert_eq!(controller.location().href(), "/search?query=kool&page=2");
    assert_eq!(
        backend.requests(),
        vec![request("kool", "Sisulehed", 1), request("kool", "Sisulehed", 2)]
    );
}

#[tokio::test]
async fn test_paging_back_refetches() {
    let backend = RecordingBackend::replying(counted_response(CategoryCounts::new(25, 4, 1)));
    let mut controller = mount(
        "/search?query=kool",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;
    assert_eq!(controller.total_pages(), 3);

    controller.dispatch(ShellIntent::PageSelected(2));
    controller.wait_idle().await;
    assert_eq!(controller.location().href(), "/search?query=kool&page=2");

    controller.dispatch(ShellIntent::PageSelected(1));
    controller.wait_idle().await;

    assert_eq!(backend.pages_requested(), vec![1, 2, 1]);
    assert_eq!(controller.fetch_count(), 3);
    assert_eq!(controller.location().href(), "/search?query=kool");
}

#[tokio::test]
async fn test_page_zero_is_clamped() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?query=kool&page=2",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;

    controller.on_page_change(0);
    controller.wait_idle().await;

    assert_eq!(controller.state().page, 1);
    assert_eq!(backend.pages_requested(), vec![2, 1]);
}

#[tokio::test]
async fn test_same_page_does_not_refetch() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?query=kool&page=2",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;

    controller.on_page_change(2);
    assert_eq!(controller.fetch_count(), 1);
}

// ============================================================================
// Responses
// ============================================================================

#[tokio::test]
async fn test_success_populates_results() {
    let backend = RecordingBackend::replying(pages_response("Kool", 3));
    let mut controller = mount(
        "/search?query=kool",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;

    let state = controller.state();
    assert_eq!(state.results.pages.len(), 3);
    assert!(state.results.events.is_empty());
    assert_eq!(state.counts, CategoryCounts::new(3, 0, 0));
    assert_eq!(controller.total_pages(), 1);
    assert!(controller.last_failure().is_none());

    let view = controller.view();
    assert_eq!(view.pagination.total_pages, 1);
    assert!(!view.pagination.has_next());
    assert!(matches!(view.results, ResultPane::Results(props) if props.results.len() == 3));
}

#[tokio::test]
async fn test_rejected_search_shows_empty_state() {
    let backend = RecordingBackend::replying(SearchResponse::failed("timeout"));
    let mut controller = mount(
        "/search?query=kool",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;

    assert!(!controller.is_loading());
    assert!(controller.state().results.is_empty());
    assert_eq!(controller.total_pages(), 0);
    assert!(controller.last_failure().unwrap().contains("timeout"));
    assert!(matches!(controller.view().results, ResultPane::Results(props) if props.results.is_empty()));
}

#[tokio::test]
async fn test_failure_clears_previous_results() {
    let backend = RecordingBackend::new(|req| {
        if req.page == 1 {
            Ok(pages_response("kool", 10))
        } else {
            Ok(SearchResponse::failed("index unavailable"))
        }
    });
    let mut controller = mount(
        "/search?query=kool",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;
    assert_eq!(controller.state().results.len(), 10);

    controller.on_page_change(2);
    controller.wait_idle().await;

    assert!(controller.state().results.is_empty());
    assert!(controller.last_failure().is_some());

    // A later success clears the failure note.
    controller.on_page_change(1);
    controller.wait_idle().await;
    assert!(controller.last_failure().is_none());
}

#[tokio::test]
async fn test_new_fetch_hides_previous_failure() {
    let backend = RecordingBackend::new(|req| {
        if req.page == 1 {
            Ok(SearchResponse::failed("timeout"))
        } else {
            Ok(pages_response("kool", 10))
        }
    });
    let mut controller = mount(
        "/search?query=kool",
        ControllerOptions::standard(),
        backend.clone(),
    );
    controller.wait_idle().await;
    assert!(controller.last_failure().is_some());

    controller.on_page_change(2);

    assert!(controller.is_loading());
    assert!(controller.last_failure().is_none());
    assert_eq!(controller.view().results, ResultPane::Loading);
}

// ============================================================================
// Stale Responses
// ============================================================================

#[tokio::test]
async fn test_late_response_for_old_page_is_discarded() {
    let backend = GatedBackend::new();
    let first = backend.gate(1);
    let second = backend.gate(2);
    let history = MemoryHistory::from_href("/search?query=kool").unwrap();
    let mut controller =
        SearchController::mount(ControllerOptions::standard(), history, client(backend)).unwrap();

    controller.on_page_change(2);
    assert_eq!(controller.outstanding_fetches(), 2);

    second.send(pages_response("teine", 2)).unwrap();
    controller.wait_idle().await;
    assert_eq!(controller.state().results.pages[0]["title"], "teine 0");

    first.send(pages_response("esimene", 5)).unwrap();
    drain(&mut controller).await;

    assert_eq!(controller.state().page, 2);
    assert_eq!(controller.state().results.len(), 2);
    assert_eq!(controller.state().results.pages[0]["title"], "teine 0");
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_early_response_for_old_page_keeps_loading() {
    let backend = GatedBackend::new();
    let first = backend.gate(1);
    let second = backend.gate(2);
    let history = MemoryHistory::from_href("/search?query=kool").unwrap();
    let mut controller =
        SearchController::mount(ControllerOptions::standard(), history, client(backend)).unwrap();

    controller.on_page_change(2);

    first.send(pages_response("esimene", 5)).unwrap();
    while controller.outstanding_fetches() > 1 {
        tokio::task::yield_now().await;
        controller.poll();
    }
    assert!(controller.is_loading());
    assert!(controller.state().results.is_empty());

    second.send(pages_response("teine", 2)).unwrap();
    controller.wait_idle().await;
    assert_eq!(controller.state().results.len(), 2);
}

#[tokio::test]
async fn test_clearing_query_supersedes_in_flight_fetch() {
    let backend = GatedBackend::new();
    let first = backend.gate(1);
    let history = MemoryHistory::from_href("/search?query=kool").unwrap();
    let mut controller =
        SearchController::mount(ControllerOptions::standard(), history, client(backend)).unwrap();

    controller.on_query_text_change("");
    controller.on_submit();
    assert!(!controller.is_loading());

    first.send(pages_response("kool", 4)).unwrap();
    drain(&mut controller).await;

    assert!(controller.state().results.is_empty());
}

// ============================================================================
// Live Variant
// ============================================================================

#[tokio::test]
async fn test_live_mode_mirrors_keystrokes() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount("/search", ControllerOptions::live(), backend.clone());
    assert_eq!(controller.state().selected_tag, "Kõik");

    controller.on_query_text_change("ko");
    assert_eq!(controller.location().href(), "/search?query=ko");
    controller.on_query_text_change("kool");
    assert_eq!(controller.location().href(), "/search?query=kool");
    assert_eq!(controller.fetch_count(), 0);

    controller.on_submit();
    controller.wait_idle().await;
    assert_eq!(backend.requests(), vec![request("kool", "Kõik", 1)]);
    assert_eq!(controller.location().href(), "/search?query=kool");
}

#[tokio::test]
async fn test_live_mode_accepts_all_category_from_url() {
    let backend = RecordingBackend::replying(pages_response("x", 1));
    let mut controller = mount(
        "/search?query=kool&tag=Isikud",
        ControllerOptions::live(),
        backend.clone(),
    );
    controller.wait_idle().await;

    controller.on_tag_change("Kõik");
    controller.wait_idle().await;

    assert_eq!(
        backend.requests(),
        vec![request("kool", "Isikud", 1), request("kool", "Kõik", 1)]
    );
    assert_eq!(controller.location().href(), "/search?query=kool");
}
