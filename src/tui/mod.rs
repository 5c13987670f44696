// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest session snapshot plus purely
// local state (input buffer, scroll, confirmation dialogs). The session actor
// pushes `UiUpdate` messages over an mpsc channel; the TUI applies them to
// `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::cards::{PickerState, Rank};
use crate::protocol::{SessionSnapshot, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Action waiting for a y/n answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Reset,
    Shutdown,
}

/// TUI-local state for rendering.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest session state.
    pub session: SessionSnapshot,
    /// Text being typed.
    pub input: String,
    /// Transcript lines scrolled up from the newest entry; 0 follows the tail.
    pub scroll_offset: usize,
    /// Rank typed in the picker, waiting for a suit.
    pub picker_rank: Option<Rank>,
    pub confirm: Option<ConfirmAction>,
}

impl ViewState {
    /// Apply a full snapshot from the session.
    ///
    /// New transcript entries snap the view back to the newest one.
    pub fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        if snapshot.transcript.len() > self.session.transcript.len() {
            self.scroll_offset = 0;
        }
        if snapshot.picker == PickerState::Closed {
            self.picker_rank = None;
        }
        self.session = snapshot;
    }

    pub fn picker_open(&self) -> bool {
        matches!(self.session.picker, PickerState::Open(_))
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::card_slots::render(frame, layout.card_row, state);
    widgets::transcript::render(frame, layout.transcript, state);
    widgets::analysis::render(frame, layout.analysis, state);
    widgets::input_box::render(frame, layout.input, state);
    render_help_bar(frame, &layout, state);

    if state.picker_open() {
        widgets::picker::render(frame, frame.area(), state);
    }
    if let Some(action) = state.confirm {
        widgets::confirm::render(frame, frame.area(), action);
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = if state.picker_open() {
        " rank+suit:Pick (e.g. a h) | \u{2190}/\u{2192}:Slot | Backspace:Undo rank | Esc:Close"
    } else {
        " Enter:Send | Tab:Cards | Ctrl+L:Clear cards | Ctrl+R:Reset | Ctrl+X:Stop backend | PgUp/PgDn:Scroll | Ctrl+C:Quit"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Session loop exited.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
