//! Search page view: renders a [`ShellView`] frame.
//!
//! Layout, top to bottom: input box, category row, results, pagination and
//! the current URL. Each hit is a single line; rows carry no styling of
//! their own.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::search::models::{CategoryResults, SearchHit};
use crate::core::search::shell::{
    CategorySelectorProps, PaginationProps, ResultListProps, ResultPane, ShellView,
};
use crate::tui::theme;

/// Shown instead of results while a search is in flight.
pub const LOADING_TEXT: &str = "Tulemuste laadimine, palun oodake...";

/// Fields tried, in order, to label a hit.
const LABEL_FIELDS: [&str; 3] = ["title", "name", "url"];

pub fn render(frame: &mut Frame, area: Rect, view: &ShellView<'_>, href: &str, failure: Option<&str>) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(view.input.value.to_string()),
        Span::styled("▏", theme::muted()),
    ]))
    .block(theme::block("Otsi"));
    frame.render_widget(input, chunks[0]);

    frame.render_widget(Paragraph::new(tag_row(&view.categories)), chunks[1]);

    let mut body = match view.results {
        ResultPane::Hidden => Vec::new(),
        ResultPane::Loading => vec![Line::styled(LOADING_TEXT, theme::muted())],
        ResultPane::Results(props) => result_lines(&props),
    };
    if let Some(reason) = failure {
        body.push(Line::styled(format!("({reason})"), theme::error()));
    }
    frame.render_widget(Paragraph::new(body).block(theme::block("Tulemused")), chunks[2]);

    frame.render_widget(Paragraph::new(pagination_line(&view.pagination)), chunks[3]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(href.to_string(), theme::dim()),
            Span::styled(
                "   [Enter]:otsi [Tab]:kategooria [←/→]:leht [Esc]:välju",
                theme::dim(),
            ),
        ])),
        chunks[4],
    );
}

fn tag_row(props: &CategorySelectorProps<'_>) -> Line<'static> {
    let spans: Vec<Span<'static>> = props
        .options
        .iter()
        .flat_map(|tag| {
            let style = if tag == props.selected {
                theme::selected_tag()
            } else {
                theme::dim()
            };
            [Span::styled(format!(" {tag} "), style), Span::raw(" ")]
        })
        .collect();
    Line::from(spans)
}

/// One heading per non-empty category, then one line per hit.
pub fn result_lines(props: &ResultListProps<'_>) -> Vec<Line<'static>> {
    let CategoryResults {
        pages,
        events,
        contacts,
    } = props.results;

    if props.results.is_empty() {
        return vec![Line::styled("Tulemusi ei leitud.", theme::muted())];
    }

    let mut lines = Vec::new();
    for (heading, hits) in [("Sisulehed", pages), ("Üritused", events), ("Isikud", contacts)] {
        if hits.is_empty() {
            continue;
        }
        lines.push(Line::styled(heading.to_string(), theme::heading()));
        lines.extend(hits.iter().map(|hit| Line::raw(format!("  {}", hit_label(hit)))));
    }
    lines
}

fn pagination_line(props: &PaginationProps) -> Line<'static> {
    if props.total_pages == 0 {
        return Line::default();
    }
    let arrow = |enabled: bool, glyph: &'static str| {
        Span::styled(glyph, if enabled { theme::muted() } else { theme::dim() })
    };
    Line::from(vec![
        arrow(props.has_prev(), "◀ "),
        Span::raw(format!("{} / {}", props.current_page, props.total_pages)),
        arrow(props.has_next(), " ▶"),
    ])
}

/// Single-line label for a hit: its first string label field, or compact JSON.
pub fn hit_label(hit: &SearchHit) -> String {
    LABEL_FIELDS
        .iter()
        .find_map(|field| hit.get(field).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| hit.to_string())
}
