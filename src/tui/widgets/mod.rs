// TUI widget modules, one per screen zone plus the two overlays.

pub mod analysis;
pub mod card_slots;
pub mod confirm;
pub mod input_box;
pub mod picker;
pub mod status_bar;
pub mod transcript;
