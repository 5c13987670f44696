// Status bar widget: session activity indicator and the latest notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{NoticeLevel, SessionSnapshot};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [activity dot] [activity label] | [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (label, color) = activity_indicator(&state.session);
    let mut spans = vec![
        Span::styled(" \u{25CF} ", Style::default().fg(color)),
        Span::styled(label, Style::default().fg(Color::White)),
    ];

    if let Some(notice) = &state.session.notice {
        let style = match notice.level {
            NoticeLevel::Info => Style::default().fg(Color::Green),
            NoticeLevel::Error => Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        };
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(notice.text.clone(), style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Label and dot colour for what the session is doing.
pub fn activity_indicator(session: &SessionSnapshot) -> (&'static str, Color) {
    if session.shut_down {
        ("Backend stopped", Color::Red)
    } else if session.polling {
        ("Waiting for pending response", Color::Yellow)
    } else if !session.input_enabled {
        ("Working...", Color::Yellow)
    } else {
        ("Ready", Color::Green)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
