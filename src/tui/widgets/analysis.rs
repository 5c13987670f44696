// Analysis widget: recommended action, strategy mix bars, and the math card.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::analysis::{ActionKind, AnalysisView};
use crate::tui::ViewState;

/// Width of a 100 % bar.
const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match &state.session.analysis {
        Some(view) if !view.is_empty() => view_lines(view),
        _ => vec![Line::from(Span::styled(
            "No analysis yet. Enter your cards and ask a question.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Analysis "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn view_lines(view: &AnalysisView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(rec) = &view.recommendation {
        let color = kind_color(ActionKind::classify(&rec.action));
        let mut spans = vec![
            Span::styled("Play: ", Style::default().fg(Color::Gray)),
            Span::styled(
                rec.action.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(amount) = &rec.amount {
            spans.push(Span::styled(format!(" {amount}"), Style::default().fg(color)));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    if !view.rows.is_empty() {
        lines.push(section_header("Strategy"));
        let label_width = view.rows.iter().map(|r| r.action.len()).max().unwrap_or(0);
        for row in &view.rows {
            let color = kind_color(row.kind);
            lines.push(Line::from(vec![
                Span::raw(format!("{:<label_width$} ", row.action)),
                Span::styled(format!("{:>3}% ", row.percent), Style::default().fg(Color::White)),
                Span::styled(bar(row.percent), Style::default().fg(color)),
            ]));
        }
        lines.push(Line::default());
    }

    if let Some(math) = &view.math {
        lines.push(section_header("Math"));
        lines.push(math_line("SPR", &math.spr));
        lines.push(math_line("Pot odds", &math.pot_odds));
        lines.push(math_line("To call", &math.call_amount));
    }

    lines
}

fn section_header(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::UNDERLINED),
    ))
}

fn math_line(label: &'static str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<9}"), Style::default().fg(Color::Gray)),
        Span::raw(value.to_string()),
    ])
}

/// Block bar proportional to `percent`; any non-zero share gets one cell.
pub fn bar(percent: u32) -> String {
    let cells = (percent.min(100) as usize * BAR_WIDTH).div_ceil(100);
    "\u{2588}".repeat(cells)
}

pub fn kind_color(kind: ActionKind) -> Color {
    match kind {
        ActionKind::Raise => Color::Red,
        ActionKind::Bet => Color::LightRed,
        ActionKind::Call => Color::Green,
        ActionKind::Check => Color::Cyan,
        ActionKind::Fold => Color::Blue,
        ActionKind::Neutral => Color::Gray,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
