// Card picker overlay: a 4 x 13 deck grid centered over the dashboard.
//
// Cards already sitting in another slot are dimmed; choosing one moves it.
// The rank typed so far is highlighted across all four suits.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::cards::card::{ALL_SUITS, PICKER_RANKS};
use crate::cards::{Card, PickerState, Rank, SlotId};
use crate::tui::ViewState;

use super::card_slots::{card_color, card_label};
use super::confirm::centered_rect;

/// 13 cells of 4 columns plus borders and margin.
const OVERLAY_WIDTH: u16 = 58;
const OVERLAY_HEIGHT: u16 = 8;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let PickerState::Open(target) = state.session.picker else {
        return;
    };
    let overlay = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area);
    frame.render_widget(Clear, overlay);

    let mut lines = vec![Line::default()];
    for suit in ALL_SUITS {
        let mut spans = vec![Span::raw(" ")];
        for rank in PICKER_RANKS {
            let card = Card::new(rank, suit);
            let style = cell_style(card, target, state);
            spans.push(Span::styled(format!(" {} ", card_label(card)), style));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());

    let title = Line::from(vec![
        Span::styled(
            format!(" Card for {} ", target),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            rank_prompt(state.picker_rank),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, overlay);
}

fn cell_style(card: Card, target: SlotId, state: &ViewState) -> Style {
    let holder = state
        .session
        .slots
        .iter()
        .find(|(_, c)| *c == Some(card))
        .map(|(slot, _)| *slot);

    let mut style = Style::default().fg(card_color(card));
    match holder {
        Some(slot) if slot == target => style = style.add_modifier(Modifier::REVERSED),
        Some(_) => style = style.add_modifier(Modifier::DIM),
        None => {}
    }
    if state.picker_rank == Some(card.rank) {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    style
}

fn rank_prompt(rank: Option<Rank>) -> String {
    match rank {
        Some(rank) => format!("{}? (s/h/c/d) ", rank.to_char()),
        None => "type a rank ".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
