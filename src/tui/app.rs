use std::io;
use std::time::Duration;

use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use super::events::{map_input, Action, AppEvent};
use super::views::search;
use crate::core::search::controller::SearchController;
use crate::core::search::url_state::History;

/// Terminal shell around a [`SearchController`] (Elm architecture).
pub struct SearchApp<H: History> {
    /// Whether the app is still running.
    pub running: bool,
    controller: SearchController<H>,
    /// Receiver for events pushed from outside the input stream.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<H: History> SearchApp<H> {
    pub fn new(controller: SearchController<H>, event_rx: mpsc::UnboundedReceiver<AppEvent>) -> Self {
        Self {
            running: true,
            controller,
            event_rx,
        }
    }

    pub fn controller(&self) -> &SearchController<H> {
        &self.controller
    }

    // ── Event loop ──────────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.handle_event(AppEvent::Tick);
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {
                self.controller.poll();
            }
            AppEvent::Input(input) => {
                let action = map_input(&input, &self.controller.view());
                match action {
                    Some(Action::Intent(intent)) => self.controller.dispatch(intent),
                    Some(Action::Quit) => self.running = false,
                    None => {}
                }
            }
            AppEvent::Quit => self.running = false,
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let href = self.controller.location().href();
        search::render(
            frame,
            area,
            &self.controller.view(),
            &href,
            self.controller.last_failure(),
        );
    }
}
