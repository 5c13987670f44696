// Shared message types: backend JSON shapes, commands from the TUI to the
// session actor, completions from network tasks, and updates pushed back to
// the TUI.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::analysis::AnalysisView;
use crate::backend::BackendError;
use crate::cards::{Card, CardSlots, PickerState, SlotId, UiStatePayload};
use crate::transcript::{PlaceholderId, TranscriptEntry, Turn};

// ---------------------------------------------------------------------------
// Backend wire types
// ---------------------------------------------------------------------------

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub ui_state: UiStatePayload,
}

/// Response of `POST /chat`. Every field is optional; `error` takes
/// precedence over everything else.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub strategy: Option<StrategyPayload>,
    #[serde(default, deserialize_with = "lenient")]
    pub game_state: Option<GameStatePayload>,
}

/// Response of `GET /state`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StateResponse {
    #[serde(default)]
    pub chat_history: Vec<Turn>,
    #[serde(default, deserialize_with = "lenient")]
    pub game_state: Option<GameStatePayload>,
    #[serde(default, deserialize_with = "lenient")]
    pub strategy: Option<StrategyPayload>,
}

/// Card lists as reported by the backend.
///
/// The backend has used two spellings for each list; the canonical key wins
/// whenever it holds a list, even an empty one. A key holding anything else
/// (the parser's `"board": {"cards": [..]}` object, say) counts as absent.
/// Entries are kept as raw JSON so that a malformed value only empties its
/// own slot instead of failing the whole response. Every other key of the
/// backend's context dict is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameStatePayload {
    #[serde(default, deserialize_with = "lenient")]
    pub hero_hole_cards: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub hero_hand: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub board_cards: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub board: Option<Vec<Value>>,
}

impl GameStatePayload {
    pub fn hero_cards(&self) -> Vec<String> {
        first_present(&self.hero_hole_cards, &self.hero_hand)
    }

    pub fn board_cards(&self) -> Vec<String> {
        first_present(&self.board_cards, &self.board)
    }

    /// Write these card lists into the slot model.
    pub fn apply_to(&self, slots: &mut CardSlots) {
        slots.apply_game_state(&self.hero_cards(), &self.board_cards());
    }
}

/// Non-string entries become empty strings, which the slot model treats as
/// an invalid (absent) card while keeping later indices in place.
fn first_present(primary: &Option<Vec<Value>>, fallback: &Option<Vec<Value>>) -> Vec<String> {
    let Some(list) = primary.as_ref().or(fallback.as_ref()) else {
        return Vec::new();
    };
    list.iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect()
}

/// Backend-computed recommendation. Opaque except for the fields the
/// analysis panel displays; a field of the wrong type reads as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StrategyPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub recommended_action: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<f64>,
    /// Action -> frequency. Values stay raw so a non-numeric entry only
    /// drops its own row.
    #[serde(default, deserialize_with = "lenient")]
    pub strategy_matrix: Option<BTreeMap<String, Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub context: Option<StrategyContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StrategyContext {
    #[serde(default, deserialize_with = "lenient")]
    pub math_data: Option<MathData>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MathData {
    /// Number or preformatted string.
    #[serde(default)]
    pub spr: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub pot_odds: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount_to_call: Option<f64>,
}

/// Decode an optional field, treating a value of the wrong shape as absent
/// instead of failing the enclosing response.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// ---------------------------------------------------------------------------
// TUI -> session
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the session actor.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// A card slot was clicked; the picker opens on it.
    SlotClicked(SlotId),
    /// A card was chosen in the open picker.
    UserSelectedCard(Card),
    /// Overlay background / close control.
    ClosePicker,
    /// Clear every slot.
    ClearCards,
    /// Send the free text together with the current cards.
    SubmitRequested(String),
    /// Start a fresh session on the backend.
    ResetRequested,
    /// Ask the backend process to exit.
    ShutdownRequested,
    Quit,
}

// ---------------------------------------------------------------------------
// Network tasks -> session
// ---------------------------------------------------------------------------

/// Completions from spawned network tasks. Each carries the generation that
/// was current when its request was issued.
#[derive(Debug)]
pub enum NetEvent {
    /// Initial `/state` fetch for reconciliation.
    StateLoaded {
        generation: u64,
        result: Result<StateResponse, BackendError>,
    },
    ChatCompleted {
        generation: u64,
        placeholder: PlaceholderId,
        result: Result<ChatResponse, BackendError>,
    },
    ResetCompleted {
        generation: u64,
        result: Result<(), BackendError>,
    },
    /// One polling fetch while a response is pending.
    PollTick {
        generation: u64,
        poll_id: u64,
        result: Result<StateResponse, BackendError>,
    },
}

// ---------------------------------------------------------------------------
// Session -> TUI
// ---------------------------------------------------------------------------

/// Severity of the notice line shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the TUI needs to draw one frame of session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub slots: [(SlotId, Option<Card>); 7],
    pub picker: PickerState,
    pub highlighted: Option<SlotId>,
    pub transcript: Vec<TranscriptEntry>,
    pub analysis: Option<AnalysisView>,
    pub input_enabled: bool,
    pub polling: bool,
    pub notice: Option<Notice>,
    pub shut_down: bool,
}

impl Default for SessionSnapshot {
    /// What the TUI shows before the session's first update.
    fn default() -> Self {
        SessionSnapshot {
            slots: CardSlots::new().entries(),
            picker: PickerState::Closed,
            highlighted: None,
            transcript: Vec::new(),
            analysis: None,
            input_enabled: false,
            polling: false,
            notice: None,
            shut_down: false,
        }
    }
}

/// Updates pushed from the session actor to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<SessionSnapshot>),
}

/// Response bodies as the coaching backend actually sends them: the parsed
/// hand context as `game_state` and the full solver result as `strategy`.
#[cfg(test)]
pub(crate) mod fixtures {
    /// `POST /chat` after a flop question.
    pub const CHAT_RESPONSE: &str = r#"{
        "advice": "Bet a third of the pot for thin value.",
        "game_state": {
            "hero_position": "BTN",
            "villain_position": "BB",
            "hero_stack_bb": 97.5,
            "villain_stack_bb": 100,
            "hero": {"position": "BTN", "cards": ["Ah", "Kh"], "stack_bb": 97.5},
            "hero_hole_cards": ["Ah", "Kh"],
            "board": {"cards": ["Ks", "7d", "2c"]},
            "board_cards": ["Ks", "7d", "2c"],
            "street": "flop",
            "actions": [{"player": "villain", "action": "check", "amount": null}],
            "is_3bet_pot": false,
            "hero_is_ip": true
        },
        "strategy": {
            "street": "flop",
            "recommended_action": "bet",
            "action_desc": "BET 33%",
            "amount": 2.0,
            "sizing_ratio": 0.33,
            "strategy_matrix": {"bet_33": 0.65, "check": 0.35, "bet_75": 0.004},
            "reasons": ["Top pair, top kicker on a dry board"],
            "reasoning": ["Top pair, top kicker on a dry board"],
            "suggestion": "BET 65% / CHECK 35%",
            "stats": "",
            "hand_info": "top_pair (top)",
            "strategic_radar": {
                "danger_meter": 2,
                "synergy_balance": "balanced",
                "advantage_summary": "Range: 1.20 | Realized: 1.10 | Nut: 1.40",
                "realization_balance": "Realization: H 1.00 / V 0.90"
            },
            "math_data": {"spr": 16.25, "current_pot": 6.0},
            "context": {
                "hand_category": "top_pair",
                "kicker_strength": "top",
                "spr": 16.25,
                "adv_ratio": 1.2,
                "advantage_data": {"hero_rf": 1.0, "villain_rf": 0.9},
                "math_data": {"spr": 16.25, "pot_odds": 0.0, "amount_to_call": 0.0}
            }
        }
    }"#;

    /// `GET /state` while the answer to the last question is still pending.
    pub const STATE_PENDING: &str = r#"{
        "chat_history": [
            {"role": "user", "content": "Hero holds QsQd. hi"},
            {"role": "assistant", "content": "Hello."},
            {"role": "user", "content": "Hero holds AhKh. Board is Ks7d2c. bet or check?"}
        ],
        "game_state": {
            "hero_hole_cards": ["Ah", "Kh"],
            "board": {"cards": ["Ks", "7d", "2c"]},
            "board_cards": ["Ks", "7d", "2c"],
            "street": "flop"
        },
        "strategy": null
    }"#;
}
