// Card picker controller: which slot the picker targets, whether the picker
// surface is open, and how it advances after each selection.

use tracing::debug;

use super::card::Card;
use super::slots::{CardSlots, SlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Closed,
    Open(SlotId),
}

/// Outcome of a card selection, reported for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The card was written to `slot`. `stolen_from` is the slot that lost
    /// the card under steal semantics.
    Committed {
        slot: SlotId,
        stolen_from: Option<SlotId>,
    },
    /// The picker was closed; nothing was written.
    Ignored,
}

/// Hole cards and the flop are entered in one sitting; the turn and river
/// stop so the user can type a note first.
fn keeps_open(slot: SlotId) -> bool {
    matches!(slot, SlotId::Hero0 | SlotId::Board0 | SlotId::Board1)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPicker {
    state: PickerState,
    /// The visually active slot. Survives closing the picker so the next
    /// target stays highlighted.
    highlighted: Option<SlotId>,
}

impl CardPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PickerState::Open(_))
    }

    pub fn highlighted(&self) -> Option<SlotId> {
        self.highlighted
    }

    /// A slot was clicked: open the picker on it.
    pub fn open(&mut self, slot: SlotId) {
        self.state = PickerState::Open(slot);
        self.highlighted = Some(slot);
    }

    /// Commit `card` to the open slot and apply the auto-advance policy.
    pub fn select(&mut self, card: Card, slots: &mut CardSlots) -> Selection {
        let PickerState::Open(slot) = self.state else {
            debug!("Card {} selected with picker closed, ignoring", card);
            return Selection::Ignored;
        };

        let stolen_from = slots.assign(slot, card);
        let next = slot.next();

        if keeps_open(slot) {
            // keeps_open slots are never the last in sequence
            if let Some(next) = next {
                self.state = PickerState::Open(next);
                self.highlighted = Some(next);
            }
        } else {
            self.state = PickerState::Closed;
            self.highlighted = next.or(Some(slot));
        }

        Selection::Committed { slot, stolen_from }
    }

    /// Overlay background or close control.
    pub fn close(&mut self) {
        self.state = PickerState::Closed;
    }

    /// Clear action: empties the model and forgets the active slot.
    pub fn clear(&mut self, slots: &mut CardSlots) {
        slots.clear_all();
        self.state = PickerState::Closed;
        self.highlighted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::slots::ALL_SLOTS;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn select_at(slot: SlotId, c: &str) -> (CardPicker, CardSlots) {
        let mut picker = CardPicker::new();
        let mut slots = CardSlots::new();
        picker.open(slot);
        picker.select(card(c), &mut slots);
        (picker, slots)
    }

    #[test]
    fn hero_0_advances_and_stays_open() {
        let (picker, slots) = select_at(SlotId::Hero0, "Ah");
        assert_eq!(picker.state(), PickerState::Open(SlotId::Hero1));
        assert_eq!(picker.highlighted(), Some(SlotId::Hero1));
        assert_eq!(slots.get(SlotId::Hero0), Some(card("Ah")));
    }

    #[test]
    fn hero_1_closes_and_highlights_board_0() {
        let (picker, _) = select_at(SlotId::Hero1, "Kh");
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(picker.highlighted(), Some(SlotId::Board0));
    }

    #[test]
    fn flop_slots_chain_then_close() {
        let (picker, _) = select_at(SlotId::Board0, "7s");
        assert_eq!(picker.state(), PickerState::Open(SlotId::Board1));

        let (picker, _) = select_at(SlotId::Board1, "8d");
        assert_eq!(picker.state(), PickerState::Open(SlotId::Board2));

        let (picker, _) = select_at(SlotId::Board2, "9c");
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(picker.highlighted(), Some(SlotId::Board3));
    }

    #[test]
    fn turn_and_river_close() {
        let (picker, _) = select_at(SlotId::Board3, "2h");
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(picker.highlighted(), Some(SlotId::Board4));

        let (picker, _) = select_at(SlotId::Board4, "3h");
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(picker.highlighted(), Some(SlotId::Board4));
    }

    #[test]
    fn full_hand_and_flop_entry() {
        let mut picker = CardPicker::new();
        let mut slots = CardSlots::new();

        picker.open(SlotId::Hero0);
        picker.select(card("Ah"), &mut slots);
        picker.select(card("Kh"), &mut slots);
        assert!(!picker.is_open());

        picker.open(SlotId::Board0);
        for c in ["7s", "8d", "9c"] {
            picker.select(card(c), &mut slots);
        }
        assert!(!picker.is_open());

        let snap = slots.snapshot();
        assert_eq!(snap.hero, vec![card("Ah"), card("Kh")]);
        assert_eq!(snap.board, vec![card("7s"), card("8d"), card("9c")]);
    }

    #[test]
    fn select_while_closed_is_ignored() {
        let mut picker = CardPicker::new();
        let mut slots = CardSlots::new();
        assert_eq!(picker.select(card("Ah"), &mut slots), Selection::Ignored);
        assert!(slots.is_empty());
    }

    #[test]
    fn select_reports_steal() {
        let mut picker = CardPicker::new();
        let mut slots = CardSlots::new();
        slots.assign(SlotId::Board4, card("Ah"));
        picker.open(SlotId::Hero0);
        assert_eq!(
            picker.select(card("Ah"), &mut slots),
            Selection::Committed {
                slot: SlotId::Hero0,
                stolen_from: Some(SlotId::Board4),
            }
        );
        assert_eq!(slots.get(SlotId::Board4), None);
    }

    #[test]
    fn close_preserves_highlight() {
        let mut picker = CardPicker::new();
        picker.open(SlotId::Board2);
        picker.close();
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(picker.highlighted(), Some(SlotId::Board2));
    }

    #[test]
    fn clicking_another_slot_retargets() {
        let mut picker = CardPicker::new();
        picker.open(SlotId::Hero0);
        picker.open(SlotId::Board3);
        assert_eq!(picker.state(), PickerState::Open(SlotId::Board3));
        assert_eq!(picker.highlighted(), Some(SlotId::Board3));
    }

    #[test]
    fn clear_after_filling_all_slots() {
        let mut picker = CardPicker::new();
        let mut slots = CardSlots::new();
        for (slot, c) in ALL_SLOTS.iter().zip(["Ah", "Kh", "Qs", "Js", "Ts", "9d", "8c"]) {
            picker.open(*slot);
            picker.select(card(c), &mut slots);
        }
        assert_eq!(slots.filled_count(), 7);

        picker.open(SlotId::Board1);
        picker.clear(&mut slots);

        assert!(slots.is_empty());
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(picker.highlighted(), None);
    }
}
