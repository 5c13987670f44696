// Analysis panel: projects the backend's strategy payload into display rows.
//
// The payload is opaque beyond the handful of fields shown here; anything
// missing is simply left out of the view.

use serde_json::Value;

use crate::protocol::{MathData, StrategyPayload};

/// Matrix rows below this frequency are not shown.
const MIN_FREQUENCY: f64 = 0.01;

/// Colour class of a matrix row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Raise,
    Bet,
    Call,
    Check,
    Fold,
    Neutral,
}

impl ActionKind {
    /// Classify by substring; "raise" and "allin" share a class.
    pub fn classify(action: &str) -> Self {
        let action = action.to_ascii_lowercase();
        if action.contains("raise") || action.contains("allin") {
            ActionKind::Raise
        } else if action.contains("bet") {
            ActionKind::Bet
        } else if action.contains("call") {
            ActionKind::Call
        } else if action.contains("check") {
            ActionKind::Check
        } else if action.contains("fold") {
            ActionKind::Fold
        } else {
            ActionKind::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Upper-cased action name.
    pub action: String,
    /// Sizing such as "2.5 BB", present only for positive amounts.
    pub amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    pub action: String,
    pub percent: u32,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MathSummary {
    pub spr: String,
    pub pot_odds: String,
    pub call_amount: String,
}

/// Display data for one strategy payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisView {
    pub recommendation: Option<Recommendation>,
    /// Sorted by frequency, highest first.
    pub rows: Vec<ActionRow>,
    pub math: Option<MathSummary>,
}

impl AnalysisView {
    pub fn from_payload(strategy: &StrategyPayload) -> Self {
        let recommendation = strategy
            .recommended_action
            .as_ref()
            .filter(|a| !a.is_empty())
            .map(|action| Recommendation {
                action: action.to_uppercase(),
                amount: strategy
                    .amount
                    .filter(|&a| a > 0.0)
                    .map(|a| format!("{a:.1} BB")),
            });

        let rows = strategy
            .strategy_matrix
            .as_ref()
            .map(|matrix| matrix_rows(matrix.iter()))
            .unwrap_or_default();

        let math = strategy
            .context
            .as_ref()
            .and_then(|ctx| ctx.math_data.as_ref())
            .map(math_summary);

        AnalysisView {
            recommendation,
            rows,
            math,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recommendation.is_none() && self.rows.is_empty() && self.math.is_none()
    }
}

/// Non-numeric frequencies are skipped.
fn matrix_rows<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>) -> Vec<ActionRow> {
    let mut entries: Vec<(&String, f64)> = entries
        .filter_map(|(a, f)| f.as_f64().map(|f| (a, f)))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));

    entries
        .into_iter()
        .filter(|(_, freq)| *freq >= MIN_FREQUENCY)
        .map(|(action, freq)| ActionRow {
            action: action.to_uppercase(),
            percent: (freq * 100.0).round() as u32,
            kind: ActionKind::classify(action),
        })
        .collect()
}

fn math_summary(math: &MathData) -> MathSummary {
    let spr = match &math.spr {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v != 0.0 => format!("{v:.2}"),
            _ => "-".to_string(),
        },
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "-".to_string(),
    };

    let pot_odds = match math.pot_odds {
        Some(p) if p != 0.0 => format!("{:.0}%", p * 100.0),
        _ => "-".to_string(),
    };

    let call_amount = math.amount_to_call.unwrap_or(0.0).to_string();

    MathSummary {
        spr,
        pot_odds,
        call_amount,
    }
}

/// The panel's current contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisPanel {
    view: Option<AnalysisView>,
}

impl AnalysisPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<&AnalysisView> {
        self.view.as_ref()
    }

    /// Apply a chat or state response. A response with neither a strategy
    /// nor a game state leaves the panel alone; a game state without a
    /// strategy empties it.
    pub fn update(&mut self, strategy: Option<&StrategyPayload>, has_game_state: bool) {
        if strategy.is_none() && !has_game_state {
            return;
        }
        self.view = strategy.map(AnalysisView::from_payload);
    }

    pub fn clear(&mut self) {
        self.view = None;
    }
}
