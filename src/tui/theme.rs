//! Color theme for the search shell.
//!
//! Views import styles from here instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

/// Brand red for the active category and borders.
pub const PRIMARY: Color = Color::Rgb(0xB7, 0x1C, 0x1C);
/// Muted text for secondary labels.
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Dim text for inactive categories and disabled arrows.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);
/// Failure notes.
pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);

/// Selected category button.
pub fn selected_tag() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

/// Category heading inside the result list.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn error() -> Style {
    Style::default().fg(ERROR)
}

/// A bordered block with the brand border.
pub fn block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PRIMARY))
}
