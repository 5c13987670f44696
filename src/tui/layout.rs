// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Card Row (5 rows): hero | board                   |
// +-------------------------+------------------------+
// | Transcript (60%)         | Analysis (40%)         |
// +-------------------------+------------------------+
// | Input (3 rows)                                    |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: session status and the latest notice.
    pub status_bar: Rect,
    /// Hero and board card slots.
    pub card_row: Rect,
    pub transcript: Rect,
    pub analysis: Rect,
    /// Bordered single-line text input.
    pub input: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | cards(5) | middle(fill) | input(3) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(5), // card row
            Constraint::Min(4),    // transcript + analysis
            Constraint::Length(3), // input
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(vertical[2]);

    AppLayout {
        status_bar: vertical[0],
        card_row: vertical[1],
        transcript: horizontal[0],
        analysis: horizontal[1],
        input: vertical[3],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
