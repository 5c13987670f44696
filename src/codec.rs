// Message codec: the card prefix attached to outgoing user messages.
//
// History is stored by the backend as plain text, so the card snapshot is
// carried inside the message itself ("Hero holds AhKh. Board is Ks7d2c. ")
// and recovered from it when the transcript is replayed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cards::{Card, CardSnapshot};

/// Display text for a turn that carried cards but no free text.
pub const CARDS_ONLY_PLACEHOLDER: &str = "\u{1F0CF} (cards updated)";

static HERO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Hero holds ([A-Za-z0-9]+)\.").expect("valid hero pattern"));

static BOARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Board is ([A-Za-z0-9]+)\.").expect("valid board pattern"));

/// Build the outgoing message for `cards` + `text`.
///
/// Returns `None` when there is nothing to send (no cards, blank text).
pub fn encode(cards: &CardSnapshot, text: &str) -> Option<String> {
    let mut message = String::new();
    if !cards.hero.is_empty() {
        message.push_str(&format!("Hero holds {}. ", concat(&cards.hero)));
    }
    if !cards.board.is_empty() {
        message.push_str(&format!("Board is {}. ", concat(&cards.board)));
    }
    message.push_str(text.trim());

    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

fn concat(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect()
}

/// A stored user message split back into cards and free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    pub cards: CardSnapshot,
    /// Free text with both card segments removed, trimmed.
    pub text: String,
}

impl DecodedMessage {
    /// Text to show in the transcript.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            CARDS_ONLY_PLACEHOLDER
        } else {
            &self.text
        }
    }
}

/// Decode a stored message. The first occurrence of each segment wins.
pub fn decode(message: &str) -> DecodedMessage {
    let hero = capture_cards(&HERO_RE, message);
    let board = capture_cards(&BOARD_RE, message);

    let without_hero = HERO_RE.replacen(message, 1, "");
    let clean = BOARD_RE.replacen(&without_hero, 1, "");

    DecodedMessage {
        cards: CardSnapshot { hero, board },
        text: clean.trim().to_string(),
    }
}

fn capture_cards(re: &Regex, message: &str) -> Vec<Card> {
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .map(|run| split_cards(run.as_str()))
        .unwrap_or_default()
}

/// Split a concatenated run ("AhKh") into two-character tokens. Tokens that
/// are not valid cards, and a dangling odd character, are dropped.
fn split_cards(run: &str) -> Vec<Card> {
    let chars: Vec<char> = run.chars().collect();
    chars
        .chunks_exact(2)
        .filter_map(|pair| pair.iter().collect::<String>().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(list: &[&str]) -> Vec<Card> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn snapshot(hero: &[&str], board: &[&str]) -> CardSnapshot {
        CardSnapshot {
            hero: cards(hero),
            board: cards(board),
        }
    }

    #[test]
    fn encode_hero_and_board() {
        let msg = encode(&snapshot(&["Ah", "Kh"], &["Ks", "7d", "2c"]), "  should I bet? ");
        assert_eq!(
            msg.as_deref(),
            Some("Hero holds AhKh. Board is Ks7d2c. should I bet?")
        );
    }

    #[test]
    fn encode_omits_empty_groups() {
        assert_eq!(
            encode(&snapshot(&[], &["Ks", "7d", "2c"]), "x").as_deref(),
            Some("Board is Ks7d2c. x")
        );
        assert_eq!(
            encode(&snapshot(&["Ah"], &[]), "").as_deref(),
            Some("Hero holds Ah.")
        );
        assert_eq!(encode(&snapshot(&[], &[]), "hello").as_deref(), Some("hello"));
    }

    #[test]
    fn encode_suppresses_empty_submission() {
        assert_eq!(encode(&CardSnapshot::default(), ""), None);
        assert_eq!(encode(&CardSnapshot::default(), "   \n\t"), None);
    }

    #[test]
    fn decode_strips_prefix() {
        let decoded = decode("Hero holds AhKh. Board is 7s8d9c. what now?");
        assert_eq!(decoded.cards, snapshot(&["Ah", "Kh"], &["7s", "8d", "9c"]));
        assert_eq!(decoded.text, "what now?");
        assert_eq!(decoded.display_text(), "what now?");
    }

    #[test]
    fn decode_cards_only_uses_placeholder() {
        let decoded = decode("Hero holds AhKh. Board is 7s8d9c. ");
        assert_eq!(decoded.text, "");
        assert_eq!(decoded.display_text(), CARDS_ONLY_PLACEHOLDER);
    }

    #[test]
    fn decode_plain_text_has_no_cards() {
        let decoded = decode("villain shoves, call?");
        assert!(decoded.cards.is_empty());
        assert_eq!(decoded.text, "villain shoves, call?");
    }

    #[test]
    fn decode_first_match_wins() {
        let decoded = decode("Hero holds AhKh. I think Hero holds QsQd. really");
        assert_eq!(decoded.cards.hero, cards(&["Ah", "Kh"]));
        assert_eq!(decoded.text, "I think Hero holds QsQd. really");
    }

    #[test]
    fn decode_drops_invalid_tokens() {
        let decoded = decode("Board is 7s1x9cQ. hm");
        assert_eq!(decoded.cards.board, cards(&["7s", "9c"]));
    }

    #[test]
    fn decode_is_left_inverse_of_encode() {
        let cases = [
            (snapshot(&["Ah", "Kh"], &["7s", "8d", "9c", "2h", "3d"]), "river decision"),
            (snapshot(&["Td"], &[]), "only one hole card known"),
            (snapshot(&[], &["Qc", "Jc", "Tc"]), "what beats this"),
            (snapshot(&[], &[]), "preflop question"),
        ];
        for (snap, text) in cases {
            let encoded = encode(&snap, text).unwrap();
            let decoded = decode(&encoded);
            assert_eq!(decoded.cards, snap, "cards for {encoded:?}");
            assert_eq!(decoded.text, text, "text for {encoded:?}");
        }
    }
}
