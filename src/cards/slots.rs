// Card slot model: two hero slots and five board slots, each holding at most
// one card, with a card allowed in at most one slot at a time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::card::Card;

/// Which half of the table a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotGroup {
    Hero,
    Board,
}

/// A named slot. Declaration order is the picker's auto-advance sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotId {
    Hero0,
    Hero1,
    Board0,
    Board1,
    Board2,
    Board3,
    Board4,
}

pub const HERO_SLOTS: [SlotId; 2] = [SlotId::Hero0, SlotId::Hero1];

pub const BOARD_SLOTS: [SlotId; 5] = [
    SlotId::Board0,
    SlotId::Board1,
    SlotId::Board2,
    SlotId::Board3,
    SlotId::Board4,
];

/// Every slot in sequence order.
pub const ALL_SLOTS: [SlotId; 7] = [
    SlotId::Hero0,
    SlotId::Hero1,
    SlotId::Board0,
    SlotId::Board1,
    SlotId::Board2,
    SlotId::Board3,
    SlotId::Board4,
];

impl SlotId {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn group(self) -> SlotGroup {
        match self {
            SlotId::Hero0 | SlotId::Hero1 => SlotGroup::Hero,
            _ => SlotGroup::Board,
        }
    }

    /// Position within the slot's own group (hero-1 -> 1, board-3 -> 3).
    pub fn group_index(self) -> usize {
        match self.group() {
            SlotGroup::Hero => self.index(),
            SlotGroup::Board => self.index() - HERO_SLOTS.len(),
        }
    }

    /// The following slot in sequence, or `None` after `board-4`.
    pub fn next(self) -> Option<SlotId> {
        ALL_SLOTS.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<SlotId> {
        self.index().checked_sub(1).map(|i| ALL_SLOTS[i])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotId::Hero0 => "hero-0",
            SlotId::Hero1 => "hero-1",
            SlotId::Board0 => "board-0",
            SlotId::Board1 => "board-1",
            SlotId::Board2 => "board-2",
            SlotId::Board3 => "board-3",
            SlotId::Board4 => "board-4",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_SLOTS
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| format!("unknown slot: {s}"))
    }
}

/// Cards per group in slot order, empty slots skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSnapshot {
    pub hero: Vec<Card>,
    pub board: Vec<Card>,
}

impl CardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.hero.is_empty() && self.board.is_empty()
    }

    /// The structured `ui_state` body sent alongside chat messages.
    pub fn to_ui_state(&self) -> UiStatePayload {
        UiStatePayload {
            hero_hole_cards: self.hero.iter().map(Card::to_string).collect(),
            board_cards: self.board.iter().map(Card::to_string).collect(),
        }
    }
}

/// Wire form of the card snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStatePayload {
    pub hero_hole_cards: Vec<String>,
    pub board_cards: Vec<String>,
}

/// Mapping from slot to optional card.
///
/// Uniqueness is maintained by [`CardSlots::assign`]; there is no other
/// write path, so no post-hoc validation is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSlots {
    cards: [Option<Card>; 7],
}

impl CardSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SlotId) -> Option<Card> {
        self.cards[slot.index()]
    }

    /// Slot currently holding `card`, if any.
    pub fn find(&self, card: Card) -> Option<SlotId> {
        ALL_SLOTS
            .iter()
            .copied()
            .find(|slot| self.cards[slot.index()] == Some(card))
    }

    /// Put `card` into `slot`, vacating whichever other slot held it.
    ///
    /// Returns the slot the card was stolen from.
    pub fn assign(&mut self, slot: SlotId, card: Card) -> Option<SlotId> {
        let stolen_from = self.find(card).filter(|&other| other != slot);
        if let Some(other) = stolen_from {
            debug!("Card {} moved from {} to {}", card, other, slot);
            self.cards[other.index()] = None;
        }
        self.cards[slot.index()] = Some(card);
        stolen_from
    }

    pub fn clear(&mut self, slot: SlotId) {
        self.cards[slot.index()] = None;
    }

    pub fn clear_all(&mut self) {
        self.cards = [None; 7];
    }

    pub fn is_empty(&self) -> bool {
        self.cards.iter().all(Option::is_none)
    }

    pub fn filled_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_some()).count()
    }

    pub fn snapshot(&self) -> CardSnapshot {
        let collect = |slots: &[SlotId]| -> Vec<Card> {
            slots.iter().filter_map(|&slot| self.get(slot)).collect()
        };
        CardSnapshot {
            hero: collect(&HERO_SLOTS[..]),
            board: collect(&BOARD_SLOTS[..]),
        }
    }

    /// Slot contents in sequence order, for rendering.
    pub fn entries(&self) -> [(SlotId, Option<Card>); 7] {
        ALL_SLOTS.map(|slot| (slot, self.get(slot)))
    }

    /// Replace the whole model with server-reported card lists.
    ///
    /// Index `i` of each list targets slot `i` of its group. Values that do
    /// not parse as one of the 52 cards, and indices past the end of a list,
    /// leave the slot empty.
    pub fn apply_game_state<S: AsRef<str>>(&mut self, hero: &[S], board: &[S]) {
        self.clear_all();
        self.fill_group(&HERO_SLOTS, hero);
        self.fill_group(&BOARD_SLOTS, board);
    }

    /// Overwrite a single group with `cards`, leaving the other group intact
    /// except for cards stolen by the new assignments.
    pub fn replace_group(&mut self, group: SlotGroup, cards: &[Card]) {
        let slots: &[SlotId] = match group {
            SlotGroup::Hero => &HERO_SLOTS,
            SlotGroup::Board => &BOARD_SLOTS,
        };
        for &slot in slots {
            self.clear(slot);
        }
        for (&slot, &card) in slots.iter().zip(cards) {
            self.assign(slot, card);
        }
    }

    fn fill_group<S: AsRef<str>>(&mut self, slots: &[SlotId], values: &[S]) {
        for (&slot, raw) in slots.iter().zip(values) {
            match Card::parse_lenient(raw.as_ref()) {
                Some(card) => {
                    self.assign(slot, card);
                }
                None => {
                    debug!("Ignoring invalid card {:?} for {}", raw.as_ref(), slot);
                    self.clear(slot);
                }
            }
        }
    }
}
