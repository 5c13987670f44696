// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the session,
// or into local ViewState mutations (typing, scrolling, confirmations).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::cards::{Card, PickerState, Rank, SlotId, Suit};
use crate::protocol::UserCommand;
use super::{ConfirmAction, ViewState};

/// Transcript lines moved per PgUp/PgDn.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// session. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits, whatever mode is active.
    if ctrl && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if let Some(action) = view_state.confirm {
        return handle_confirm(key_event, view_state, action);
    }

    if view_state.session.shut_down {
        return None;
    }

    // Shortcuts work with the picker open too.
    if ctrl {
        return match key_event.code {
            KeyCode::Char('l') => Some(UserCommand::ClearCards),
            KeyCode::Char('r') => {
                view_state.confirm = Some(ConfirmAction::Reset);
                None
            }
            KeyCode::Char('x') => {
                view_state.confirm = Some(ConfirmAction::Shutdown);
                None
            }
            _ => None,
        };
    }

    if let PickerState::Open(slot) = view_state.session.picker {
        return handle_picker(key_event, view_state, slot);
    }

    match key_event.code {
        KeyCode::Tab => Some(UserCommand::SlotClicked(
            view_state.session.highlighted.unwrap_or(SlotId::Hero0),
        )),
        KeyCode::PageUp => {
            view_state.scroll_offset = view_state.scroll_offset.saturating_add(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.scroll_offset = view_state.scroll_offset.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::Enter if view_state.session.input_enabled => {
            let text = std::mem::take(&mut view_state.input);
            Some(UserCommand::SubmitRequested(text))
        }
        KeyCode::Backspace if view_state.session.input_enabled => {
            view_state.input.pop();
            None
        }
        KeyCode::Char(c) if view_state.session.input_enabled => {
            view_state.input.push(c);
            None
        }
        _ => None,
    }
}

/// y confirms, n/Esc cancels, everything else is blocked.
fn handle_confirm(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    action: ConfirmAction,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm = None;
            Some(match action {
                ConfirmAction::Reset => UserCommand::ResetRequested,
                ConfirmAction::Shutdown => UserCommand::ShutdownRequested,
            })
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm = None;
            None
        }
        _ => None,
    }
}

/// Picker keys: a rank then a suit selects a card.
fn handle_picker(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    slot: SlotId,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.picker_rank = None;
            Some(UserCommand::ClosePicker)
        }
        KeyCode::Left => {
            view_state.picker_rank = None;
            slot.prev().map(UserCommand::SlotClicked)
        }
        KeyCode::Right | KeyCode::Tab => {
            view_state.picker_rank = None;
            slot.next().map(UserCommand::SlotClicked)
        }
        KeyCode::Backspace => {
            view_state.picker_rank = None;
            None
        }
        KeyCode::Char(c) => match view_state.picker_rank {
            None => {
                view_state.picker_rank = picker_rank(c);
                None
            }
            Some(rank) => match Suit::from_char(c) {
                Ok(suit) => {
                    view_state.picker_rank = None;
                    Some(UserCommand::UserSelectedCard(Card::new(rank, suit)))
                }
                // A second rank replaces the first.
                Err(_) => {
                    if let Some(rank) = picker_rank(c) {
                        view_state.picker_rank = Some(rank);
                    }
                    None
                }
            },
        },
        _ => None,
    }
}

/// '1' stands for ten, as in "10".
fn picker_rank(c: char) -> Option<Rank> {
    match c {
        '1' => Some(Rank::Ten),
        c => Rank::from_char(c).ok(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
