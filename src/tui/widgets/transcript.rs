// Transcript widget: the conversation with the coach, newest at the bottom.
//
// Lines are wrapped here rather than by `Paragraph` so that the scroll
// offset can be counted in wrapped rows from the tail.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::transcript::{Role, TranscriptEntry};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines = build_lines(&state.session.transcript, inner_width);
    let (start, end) = visible_window(lines.len(), inner_height, state.scroll_offset);

    let title = if end < lines.len() {
        format!(" Coach ({} more below) ", lines.len() - end)
    } else {
        " Coach ".to_string()
    };

    let paragraph = Paragraph::new(lines[start..end].to_vec())
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

/// Rows `[start, end)` to show for a tail-anchored view scrolled up by
/// `offset` rows. The offset is clamped so the first row stays reachable.
pub fn visible_window(total: usize, height: usize, offset: usize) -> (usize, usize) {
    let max_offset = total.saturating_sub(height);
    let end = total - offset.min(max_offset);
    (end.saturating_sub(height), end)
}

fn build_lines(entries: &[TranscriptEntry], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in entries {
        match entry {
            TranscriptEntry::Turn { role, text } => {
                let (label, style) = speaker(*role);
                lines.push(Line::from(Span::styled(label, style)));
                for row in wrap_text(text, width.saturating_sub(2)) {
                    lines.push(Line::from(format!("  {row}")));
                }
            }
            TranscriptEntry::Loading(_) => {
                let (label, style) = speaker(Role::Assistant);
                lines.push(Line::from(Span::styled(label, style)));
                lines.push(Line::from(Span::styled(
                    "  thinking...",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn speaker(role: Role) -> (&'static str, Style) {
    match role {
        Role::User => ("You", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Role::Assistant => ("Coach", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Role::Other => ("System", Style::default().fg(Color::Gray)),
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for paragraph in text.lines() {
        let mut row = String::new();
        let mut row_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if row_len > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_len = 0;
                }
                rows.push(word.drain(..width).collect());
            }
            if word.is_empty() {
                continue;
            }
            let extra = if row_len == 0 { word.len() } else { word.len() + 1 };
            if row_len + extra > width {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
            }
            if row_len > 0 {
                row.push(' ');
                row_len += 1;
            }
            row.extend(word.iter());
            row_len += word.len();
        }
        rows.push(row);
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::PlaceholderId;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("check the river then fold", 10),
            vec!["check the", "river then", "fold"]
        );
    }

    #[test]
    fn wrap_splits_long_words_and_keeps_blank_lines() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn window_follows_tail() {
        assert_eq!(visible_window(30, 10, 0), (20, 30));
        assert_eq!(visible_window(30, 10, 5), (15, 25));
        // Clamped at the top.
        assert_eq!(visible_window(30, 10, 100), (0, 10));
        // Fewer rows than the viewport.
        assert_eq!(visible_window(4, 10, 3), (0, 4));
    }

    #[test]
    fn loading_entry_renders_thinking_row() {
        let lines = build_lines(&[TranscriptEntry::Loading(PlaceholderId(1))], 40);
        assert_eq!(lines[0].spans[0].content, "Coach");
        assert_eq!(lines[1].spans[0].content, "  thinking...");
    }

    #[test]
    fn render_shows_newest_entry() {
        let backend = ratatui::backend::TestBackend::new(40, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        for i in 0..10 {
            state.session.transcript.push(TranscriptEntry::Turn {
                role: Role::Assistant,
                text: format!("answer {i}"),
            });
        }
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("answer 9"));
        assert!(!text.contains("answer 0"));
    }
}
