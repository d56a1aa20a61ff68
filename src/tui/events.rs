use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::search::shell::{ShellIntent, ShellView};

/// Events flowing through the shell's event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick: drains finished searches.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(Event),
    /// Request to quit the application.
    Quit,
}

/// What a key press resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Intent(ShellIntent),
    Quit,
}

/// Map a key press onto an action, given what is currently on screen.
///
/// Page keys only produce a page change inside `1..=total_pages`; the
/// controller does not re-check the upper bound.
pub fn map_input(event: &Event, view: &ShellView<'_>) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    match (*modifiers, *code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            Some(Action::Intent(ShellIntent::QueryChanged(String::new())))
        }
        (_, KeyCode::Enter) => Some(Action::Intent(ShellIntent::Submit)),
        (_, KeyCode::Tab) => view
            .categories
            .next()
            .map(|tag| Action::Intent(ShellIntent::TagSelected(tag.to_string()))),
        (_, KeyCode::BackTab) => view
            .categories
            .prev()
            .map(|tag| Action::Intent(ShellIntent::TagSelected(tag.to_string()))),
        (_, KeyCode::Left | KeyCode::PageUp) if view.pagination.has_prev() => Some(
            Action::Intent(ShellIntent::PageSelected(view.pagination.current_page - 1)),
        ),
        (_, KeyCode::Right | KeyCode::PageDown) if view.pagination.has_next() => Some(
            Action::Intent(ShellIntent::PageSelected(view.pagination.current_page + 1)),
        ),
        (_, KeyCode::Backspace) => {
            let mut draft = view.input.value.to_string();
            draft.pop()?;
            Some(Action::Intent(ShellIntent::QueryChanged(draft)))
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            let mut draft = view.input.value.to_string();
            draft.push(c);
            Some(Action::Intent(ShellIntent::QueryChanged(draft)))
        }
        _ => None,
    }
}
