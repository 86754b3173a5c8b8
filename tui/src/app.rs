//! Main Application
//!
//! The App struct manages the TUI lifecycle:
//! - Event loop (keyboard, mouse, resize)
//! - Pumping due stage events into the ticker
//! - Rendering the viewport
//!
//! The ticker itself never sees the terminal. The app translates terminal
//! input into clicks on the [`Stage`]; the stage's own timers and slides
//! produce the rest.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use ticker_core::{InteractionMode, NodeId, Phase, Ticker, TickerConfig};

use crate::stage::{EasingFunction, Stage};
use crate::theme::{DIM_GRAY, TICKER_BORDER, TICKER_BORDER_WAITING, TICKER_TEXT};
use crate::widgets::{container_rect, TickerLayout, TickerView};

/// Frame pacing for the event loop
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// The ticker, which owns the stage as its host
    ticker: Ticker<Stage>,
    /// Pixels of slide offset per terminal row
    px_per_row: u16,
    /// Terminal size
    area: Rect,
}

impl App {
    /// Create the app and start the ticker
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker cannot initialize on the stage.
    pub fn new(
        config: TickerConfig,
        easing: EasingFunction,
        px_per_row: u16,
        area: Rect,
    ) -> anyhow::Result<Self> {
        let stage = Stage::new(config.transition_duration()).with_easing(easing);
        let mut ticker = Ticker::new(config, stage)?;
        ticker.initialize()?;

        Ok(Self {
            running: true,
            ticker,
            px_per_row: px_per_row.max(1),
            area,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            self.pump(Instant::now());
            self.render(terminal)?;
        }

        self.ticker.shutdown();
        Ok(())
    }

    /// Deliver everything the stage has due at `now` to the ticker
    pub fn pump(&mut self, now: Instant) {
        for event in self.ticker.host_mut().poll(now) {
            self.ticker.handle_event(event);
        }
    }

    /// Route one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.area = Rect::new(0, 0, w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            // Keyboard stand-in for clicking the viewport
            KeyCode::Char(' ') | KeyCode::Enter => {
                let viewport = self.ticker.host().viewport();
                self.click(viewport);
            }
            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let layout = self.layout();
        if let Some(target) = layout.hit_test(self.ticker.host(), mouse.column, mouse.row) {
            self.click(target);
        }
    }

    fn click(&mut self, target: NodeId) {
        match self.ticker.host().click(target) {
            Some(event) => self.ticker.handle_event(event),
            None => tracing::trace!(?target, "Click with no listener"),
        }
    }

    fn layout(&self) -> TickerLayout {
        TickerLayout::new(container_rect(self.area), self.px_per_row)
    }

    fn render(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    /// Draw the viewport and the key hints
    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let container = container_rect(area);

        let border = if self.ticker.phase() == Some(Phase::WaitingForClick) {
            TICKER_BORDER_WAITING
        } else {
            TICKER_BORDER
        };
        let view = TickerView::new(self.ticker.host(), self.px_per_row)
            .title(" ticker ")
            .text_style(Style::default().fg(TICKER_TEXT))
            .border_style(Style::default().fg(border));
        frame.render_widget(view, container);

        let hint = match self.ticker.config().interaction_mode {
            InteractionMode::Auto => "q quit",
            InteractionMode::Click => "click or space to advance · q quit",
        };
        let hint_row = (container.y + container.height).min(area.height.saturating_sub(1));
        frame.render_widget(
            Paragraph::new(Line::from(hint).centered()).style(Style::default().fg(DIM_GRAY)),
            Rect::new(area.x, hint_row, area.width, 1),
        );
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The ticker being displayed
    pub fn ticker(&self) -> &Ticker<Stage> {
        &self.ticker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn app(mode: InteractionMode) -> App {
        let config =
            TickerConfig::new(vec!["A".into(), "B".into()], "#ticker", 0, 30, mode).unwrap();
        App::new(config, EasingFunction::default(), 10, Rect::new(0, 0, 80, 24)).unwrap()
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    /// Pump until the ticker settles in `phase`
    fn pump_until(app: &mut App, phase: Phase) {
        let mut now = app.ticker().host().now();
        for _ in 0..20 {
            now += Duration::from_millis(1);
            app.pump(now);
            if app.ticker().phase() == Some(phase) {
                return;
            }
        }
        panic!("ticker never reached {phase:?}");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app(InteractionMode::Auto);
        app.handle_event(press(KeyCode::Char('x')));
        assert!(app.is_running());

        app.handle_event(press(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_space_dismisses_in_click_mode() {
        let mut app = app(InteractionMode::Click);
        pump_until(&mut app, Phase::WaitingForClick);

        app.handle_event(press(KeyCode::Char(' ')));

        assert_eq!(app.ticker().phase(), Some(Phase::Hiding));
    }

    #[test]
    fn test_mouse_click_on_text_row_dismisses() {
        let mut app = app(InteractionMode::Click);
        pump_until(&mut app, Phase::Visible);
        let layout = app.layout();

        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: layout.viewport.x + 1,
            row: layout.center_row(),
            modifiers: KeyModifiers::NONE,
        }));

        assert_eq!(app.ticker().phase(), Some(Phase::Hiding));
    }

    #[test]
    fn test_mouse_click_outside_viewport_is_ignored() {
        let mut app = app(InteractionMode::Click);
        pump_until(&mut app, Phase::Visible);

        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));

        assert_eq!(app.ticker().phase(), Some(Phase::Visible));
    }

    #[test]
    fn test_space_does_nothing_in_auto_mode() {
        let mut app = app(InteractionMode::Auto);
        pump_until(&mut app, Phase::Visible);

        app.handle_event(press(KeyCode::Char(' ')));

        assert_eq!(app.ticker().phase(), Some(Phase::Visible));
    }
}
