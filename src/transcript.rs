// Chat transcript: committed turns in backend order plus transient loading
// placeholders for responses that have not arrived yet.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::codec;

/// Speaker of a turn. The backend may store other roles (system notes,
/// tool output); they are kept so indices line up with `/state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One entry of the backend's `chat_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Turn {
            role,
            content: content.into(),
        }
    }
}

/// Handle to a loading placeholder, returned by [`Transcript::push_loading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A committed turn. For user turns `text` is the decoded display text,
    /// never the raw card prefix.
    Turn { role: Role, text: String },
    Loading(PlaceholderId),
}

impl TranscriptEntry {
    pub fn is_loading(&self) -> bool {
        matches!(self, TranscriptEntry::Loading(_))
    }
}

/// Most recent non-empty card sets found while replaying user turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveredCards {
    pub hero: Option<Vec<Card>>,
    pub board: Option<Vec<Card>>,
}

impl RecoveredCards {
    pub fn is_empty(&self) -> bool {
        self.hero.is_none() && self.board.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_placeholder: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a committed turn after everything else, placeholders included.
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::Turn {
            role,
            text: text.into(),
        });
    }

    pub fn push_loading(&mut self) -> PlaceholderId {
        self.next_placeholder += 1;
        let id = PlaceholderId(self.next_placeholder);
        self.entries.push(TranscriptEntry::Loading(id));
        id
    }

    /// Remove one placeholder. Returns false if it was already gone.
    pub fn remove_loading(&mut self, id: PlaceholderId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| *entry != TranscriptEntry::Loading(id));
        self.entries.len() != before
    }

    pub fn clear_loading(&mut self) {
        self.entries.retain(|entry| !entry.is_loading());
    }

    pub fn has_loading(&self) -> bool {
        self.entries.iter().any(TranscriptEntry::is_loading)
    }

    /// Replace the local transcript with the backend's history.
    ///
    /// User turns are decoded so the card prefix is not shown; the card sets
    /// they carried are returned, latest non-empty set per group.
    pub fn rebuild(&mut self, turns: &[Turn]) -> RecoveredCards {
        self.entries.clear();
        let mut recovered = RecoveredCards::default();

        for turn in turns {
            match turn.role {
                Role::User => {
                    let decoded = codec::decode(&turn.content);
                    if !decoded.cards.hero.is_empty() {
                        recovered.hero = Some(decoded.cards.hero.clone());
                    }
                    if !decoded.cards.board.is_empty() {
                        recovered.board = Some(decoded.cards.board.clone());
                    }
                    self.append(Role::User, decoded.display_text());
                }
                role => self.append(role, turn.content.clone()),
            }
        }

        recovered
    }

    /// Number of committed turns; placeholders are not counted.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_loading()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
