// Card row widget: two hero slots and five board slots.
//
// Red suits are drawn red. The highlighted slot (the picker's target, or the
// next one it will open on) is drawn reversed.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::cards::{Card, PickerState, SlotGroup, SlotId};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(10)])
        .split(area);

    render_group(frame, halves[0], state, SlotGroup::Hero, " Hero ");
    render_group(frame, halves[1], state, SlotGroup::Board, " Board ");
}

fn render_group(frame: &mut Frame, area: Rect, state: &ViewState, group: SlotGroup, title: &str) {
    let target = match state.session.picker {
        PickerState::Open(slot) => Some(slot),
        PickerState::Closed => None,
    };
    let focused = target.is_some_and(|slot| slot.group() == group);

    let mut spans = vec![Span::raw(" ")];
    for (slot, card) in state
        .session
        .slots
        .iter()
        .filter(|(slot, _)| slot.group() == group)
    {
        spans.extend(slot_spans(*slot, *card, state.session.highlighted == Some(*slot)));
        spans.push(Span::raw(" "));
    }

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(vec![Line::default(), Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

/// "[A♥]" style cell for one slot.
pub fn slot_spans(slot: SlotId, card: Option<Card>, highlighted: bool) -> Vec<Span<'static>> {
    let mut bracket = Style::default().fg(Color::DarkGray);
    let mut body = match card {
        Some(card) => Style::default().fg(card_color(card)).add_modifier(Modifier::BOLD),
        None => Style::default().fg(Color::DarkGray),
    };
    if highlighted {
        bracket = bracket.fg(Color::Yellow);
        body = body.add_modifier(Modifier::REVERSED);
    }
    let text = match card {
        Some(card) => card_label(card),
        // Empty board slots show their street position.
        None if slot.group() == SlotGroup::Board => format!("{:^2}", slot.group_index() + 1),
        None => "  ".to_string(),
    };
    vec![
        Span::styled("[", bracket),
        Span::styled(text, body),
        Span::styled("]", bracket),
    ]
}

/// Rank character plus suit symbol, e.g. "T♦".
pub fn card_label(card: Card) -> String {
    format!("{}{}", card.rank.to_char(), card.suit.symbol())
}

pub fn card_color(card: Card) -> Color {
    if card.suit.is_red() {
        Color::Red
    } else {
        Color::White
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
