// Card values, the slot model, and the picker state machine.

pub mod card;
pub mod picker;
pub mod slots;

pub use card::{Card, CardError, Rank, Suit};
pub use picker::{CardPicker, PickerState, Selection};
pub use slots::{CardSlots, CardSnapshot, SlotGroup, SlotId, UiStatePayload};
