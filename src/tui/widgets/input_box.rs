// Input box widget: the question being typed, or why typing is blocked.

use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let enabled = state.session.input_enabled;
    let inner_width = area.width.saturating_sub(2) as usize;

    let line = if enabled {
        let visible = tail(&state.input, inner_width.saturating_sub(1));
        Line::from(Span::raw(visible))
    } else {
        Line::from(Span::styled(
            disabled_hint(state),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    };

    let border_style = if enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ask the coach ")
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if enabled && !state.picker_open() && state.confirm.is_none() && area.height > 2 {
        let typed = state.input.chars().count().min(inner_width.saturating_sub(1));
        frame.set_cursor_position(Position::new(area.x + 1 + typed as u16, area.y + 1));
    }
}

fn disabled_hint(state: &ViewState) -> &'static str {
    if state.session.shut_down {
        "Backend stopped."
    } else if state.session.polling {
        "Waiting for the pending response..."
    } else {
        "Waiting for the coach..."
    }
}

/// The last `width` characters of `text`, so the cursor end stays visible.
fn tail(text: &str, width: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(width)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
