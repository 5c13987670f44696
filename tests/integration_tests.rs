// Integration tests for the poker coach client.
//
// These drive the session actor end to end through its channels, exactly as
// the TUI does, against a scripted in-memory backend. Only the library's
// public API is used.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use poker_coach::backend::{Backend, BackendError};
use poker_coach::cards::{Card, SlotId};
use poker_coach::config::PollingConfig;
use poker_coach::protocol::*;
use poker_coach::session::{self, Session};
use poker_coach::transcript::{Role, TranscriptEntry, Turn};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Backend double. `/state` answers are consumed in order with the last one
/// repeating.
#[derive(Default)]
struct ScriptedBackend {
    states: Mutex<VecDeque<StateResponse>>,
    chats: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
    resets: Mutex<usize>,
}

impl ScriptedBackend {
    fn with_states(states: Vec<StateResponse>) -> Arc<Self> {
        Arc::new(ScriptedBackend {
            states: Mutex::new(states.into()),
            ..Default::default()
        })
    }

    fn queue_chat(&self, response: ChatResponse) {
        self.chats.lock().unwrap().push_back(response);
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.chats.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn reset(&self) -> Result<(), BackendError> {
        *self.resets.lock().unwrap() += 1;
        Ok(())
    }

    async fn fetch_state(&self) -> Result<StateResponse, BackendError> {
        let mut states = self.states.lock().unwrap();
        let state = if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().cloned()
        };
        Ok(state.unwrap_or_default())
    }

    async fn shutdown(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(backend: Arc<ScriptedBackend>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (net_tx, net_rx) = mpsc::channel(32);
        let (ui_tx, ui_rx) = mpsc::channel(256);
        let polling = PollingConfig {
            interval_ms: 20,
            timeout_secs: 5,
        };
        let backend: Arc<dyn Backend> = backend;
        let session = Session::new(backend, polling, net_tx);
        let handle = tokio::spawn(session::run(cmd_rx, net_rx, ui_tx, session));
        Harness {
            cmd_tx,
            ui_rx,
            handle,
        }
    }

    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    /// Consume snapshots until one satisfies `pred`.
    async fn wait_for(&mut self, pred: impl Fn(&SessionSnapshot) -> bool) -> SessionSnapshot {
        let wait = async {
            loop {
                match self.ui_rx.recv().await {
                    Some(UiUpdate::Snapshot(snapshot)) if pred(&snapshot) => return *snapshot,
                    Some(_) => continue,
                    None => panic!("session loop exited early"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("expected snapshot never arrived")
    }
}

fn card(s: &str) -> Card {
    s.parse().unwrap()
}

fn slot(snapshot: &SessionSnapshot, id: SlotId) -> Option<Card> {
    snapshot
        .slots
        .iter()
        .find(|(s, _)| *s == id)
        .and_then(|(_, c)| *c)
}

fn turns(snapshot: &SessionSnapshot) -> Vec<(Role, String)> {
    snapshot
        .transcript
        .iter()
        .filter_map(|e| match e {
            TranscriptEntry::Turn { role, text } => Some((*role, text.clone())),
            TranscriptEntry::Loading(_) => None,
        })
        .collect()
}

fn history(turns: &[(Role, &str)]) -> StateResponse {
    StateResponse {
        chat_history: turns.iter().map(|(r, t)| Turn::new(*r, *t)).collect(),
        ..Default::default()
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[tokio::test]
async fn restart_mid_request_recovers_cards_and_answer() {
    let question = "Hero holds AhKh. Board is Ks7d2c. bet or check?";
    let backend = ScriptedBackend::with_states(vec![
        history(&[(Role::User, question)]),
        history(&[(Role::User, question)]),
        history(&[(Role::User, question), (Role::Assistant, "Bet one third.")]),
    ]);
    let mut harness = Harness::start(backend);

    let pending = harness.wait_for(|s| s.polling).await;
    assert!(!pending.input_enabled);
    assert!(pending.transcript.iter().any(TranscriptEntry::is_loading));
    assert_eq!(slot(&pending, SlotId::Hero0), Some(card("Ah")));
    assert_eq!(slot(&pending, SlotId::Hero1), Some(card("Kh")));
    assert_eq!(slot(&pending, SlotId::Board2), Some(card("2c")));
    assert_eq!(slot(&pending, SlotId::Board3), None);

    let done = harness.wait_for(|s| !s.polling && s.input_enabled).await;
    assert_eq!(
        turns(&done),
        vec![
            (Role::User, "bet or check?".to_string()),
            (Role::Assistant, "Bet one third.".to_string()),
        ]
    );
    assert!(!done.transcript.iter().any(TranscriptEntry::is_loading));
}

#[tokio::test]
async fn hand_entry_and_question_round_trip() {
    let backend = ScriptedBackend::with_states(vec![StateResponse::default()]);
    backend.queue_chat(ChatResponse {
        advice: Some("Open to 2.5 BB.".into()),
        strategy: Some(StrategyPayload {
            recommended_action: Some("raise".into()),
            amount: Some(2.5),
            ..Default::default()
        }),
        ..Default::default()
    });
    let mut harness = Harness::start(backend.clone());
    harness.wait_for(|s| s.input_enabled).await;

    harness.send(UserCommand::SlotClicked(SlotId::Hero0)).await;
    harness.send(UserCommand::UserSelectedCard(card("Ah"))).await;
    harness.send(UserCommand::UserSelectedCard(card("Kh"))).await;
    let cards = harness
        .wait_for(|s| slot(s, SlotId::Hero1).is_some())
        .await;
    assert_eq!(slot(&cards, SlotId::Hero0), Some(card("Ah")));

    harness
        .send(UserCommand::SubmitRequested("open?".into()))
        .await;
    let answered = harness
        .wait_for(|s| turns(s).iter().any(|(r, _)| *r == Role::Assistant))
        .await;

    assert!(answered.input_enabled);
    assert_eq!(
        turns(&answered),
        vec![
            (Role::User, "open?".to_string()),
            (Role::Assistant, "Open to 2.5 BB.".to_string()),
        ]
    );
    let rec = answered
        .analysis
        .as_ref()
        .and_then(|v| v.recommendation.clone())
        .expect("recommendation shown");
    assert_eq!(rec.action, "RAISE");
    assert_eq!(rec.amount.as_deref(), Some("2.5 BB"));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].message, "Hero holds AhKh. open?");
    assert_eq!(requests[0].ui_state.hero_hole_cards, vec!["Ah", "Kh"]);
    assert!(requests[0].ui_state.board_cards.is_empty());
}

#[tokio::test]
async fn backend_game_state_overrides_slots() {
    let backend = ScriptedBackend::with_states(vec![StateResponse::default()]);
    backend.queue_chat(ChatResponse {
        advice: Some("Noted.".into()),
        game_state: Some(GameStatePayload {
            hero_hand: Some(vec!["qs".into(), "QD".into()]),
            board: Some(vec!["Jc".into(), serde_json::Value::Null, "2h".into()]),
            ..Default::default()
        }),
        ..Default::default()
    });
    let mut harness = Harness::start(backend);
    harness.wait_for(|s| s.input_enabled).await;

    harness
        .send(UserCommand::SubmitRequested("I have queens".into()))
        .await;
    let done = harness
        .wait_for(|s| turns(s).iter().any(|(r, _)| *r == Role::Assistant))
        .await;

    assert_eq!(slot(&done, SlotId::Hero0), Some(card("Qs")));
    assert_eq!(slot(&done, SlotId::Hero1), Some(card("Qd")));
    assert_eq!(slot(&done, SlotId::Board0), Some(card("Jc")));
    assert_eq!(slot(&done, SlotId::Board1), None);
    assert_eq!(slot(&done, SlotId::Board2), Some(card("2h")));
    // Game state without strategy empties the panel.
    assert!(done.analysis.is_none());
}

#[tokio::test]
async fn reset_clears_session() {
    let backend = ScriptedBackend::with_states(vec![history(&[
        (Role::User, "Hero holds 9s9c. hi"),
        (Role::Assistant, "Hello."),
    ])]);
    let mut harness = Harness::start(backend.clone());
    let restored = harness.wait_for(|s| s.input_enabled).await;
    assert_eq!(turns(&restored).len(), 2);
    assert_eq!(slot(&restored, SlotId::Hero0), Some(card("9s")));

    harness.send(UserCommand::ResetRequested).await;
    let cleared = harness
        .wait_for(|s| s.notice.as_ref().is_some_and(|n| n.text == "Session cleared"))
        .await;
    assert!(cleared.transcript.is_empty());
    assert!(cleared.slots.iter().all(|(_, c)| c.is_none()));
    assert!(cleared.analysis.is_none());
    assert_eq!(*backend.resets.lock().unwrap(), 1);
}

#[tokio::test]
async fn shutdown_disables_input_for_good() {
    let backend = ScriptedBackend::with_states(vec![StateResponse::default()]);
    let mut harness = Harness::start(backend.clone());
    harness.wait_for(|s| s.input_enabled).await;

    harness.send(UserCommand::ShutdownRequested).await;
    let stopped = harness.wait_for(|s| s.shut_down).await;
    assert!(!stopped.input_enabled);

    harness
        .send(UserCommand::SubmitRequested("still there?".into()))
        .await;
    harness.send(UserCommand::Quit).await;
    harness.handle.await.unwrap().unwrap();
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn quit_stops_the_session_loop() {
    let backend = ScriptedBackend::with_states(vec![StateResponse::default()]);
    let harness = Harness::start(backend);
    harness.send(UserCommand::Quit).await;
    tokio::time::timeout(Duration::from_secs(5), harness.handle)
        .await
        .expect("loop exits")
        .unwrap()
        .unwrap();
}
