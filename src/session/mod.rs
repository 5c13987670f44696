// Session actor: owns the card slots, picker, transcript and analysis panel,
// and keeps them consistent with a backend that may be slow, restarted, or
// reset while requests are in flight.
//
// All state lives in one task. Network calls run in spawned tasks that only
// send a `NetEvent` back, tagged with the generation that was current when
// they were issued.

pub mod generation;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::analysis::AnalysisPanel;
use crate::backend::{Backend, BackendError};
use crate::cards::{Card, CardPicker, CardSlots, Selection, SlotGroup, SlotId};
use crate::codec;
use crate::config::PollingConfig;
use crate::protocol::{
    ChatRequest, ChatResponse, NetEvent, Notice, SessionSnapshot, StateResponse, UiUpdate,
    UserCommand,
};
use crate::transcript::{PlaceholderId, Role, Transcript};

pub use generation::RequestGeneration;

/// An active polling loop.
struct Poll {
    id: u64,
    /// `chat_history` length when polling started.
    baseline: usize,
    placeholder: PlaceholderId,
    deadline: Instant,
    task: JoinHandle<()>,
}

pub struct Session {
    backend: Arc<dyn Backend>,
    polling_config: PollingConfig,
    /// Cloned into every spawned request task.
    net_tx: mpsc::Sender<NetEvent>,

    slots: CardSlots,
    picker: CardPicker,
    transcript: Transcript,
    analysis: AnalysisPanel,

    generation: RequestGeneration,
    poll: Option<Poll>,
    next_poll_id: u64,
    /// Placeholder of the outstanding chat request, if any.
    pending_chat: Option<PlaceholderId>,
    /// True until the startup `/state` fetch has been handled.
    reconciling: bool,
    notice: Option<Notice>,
    shut_down: bool,
}

impl Session {
    pub fn new(
        backend: Arc<dyn Backend>,
        polling_config: PollingConfig,
        net_tx: mpsc::Sender<NetEvent>,
    ) -> Self {
        Session {
            backend,
            polling_config,
            net_tx,
            slots: CardSlots::new(),
            picker: CardPicker::new(),
            transcript: Transcript::new(),
            analysis: AnalysisPanel::new(),
            generation: RequestGeneration::new(),
            poll: None,
            next_poll_id: 0,
            pending_chat: None,
            reconciling: false,
            notice: None,
            shut_down: false,
        }
    }

    /// Input is accepted only when nothing is outstanding.
    pub fn input_enabled(&self) -> bool {
        !self.shut_down && !self.reconciling && self.pending_chat.is_none() && self.poll.is_none()
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            slots: self.slots.entries(),
            picker: self.picker.state(),
            highlighted: self.picker.highlighted(),
            transcript: self.transcript.entries().to_vec(),
            analysis: self.analysis.view().cloned(),
            input_enabled: self.input_enabled(),
            polling: self.poll.is_some(),
            notice: self.notice.clone(),
            shut_down: self.shut_down,
        }
    }

    // -----------------------------------------------------------------------
    // Startup reconciliation
    // -----------------------------------------------------------------------

    /// Fetch `/state` so a restarted client picks up where the backend is.
    pub fn begin_reconcile(&mut self) {
        self.reconciling = true;
        let generation = self.generation.begin_request();
        let backend = Arc::clone(&self.backend);
        let tx = self.net_tx.clone();
        tokio::spawn(async move {
            let result = backend.fetch_state().await;
            let _ = tx.send(NetEvent::StateLoaded { generation, result }).await;
        });
        debug!("Requested initial state (gen: {})", generation);
    }

    fn handle_state_loaded(&mut self, generation: u64, result: Result<StateResponse, BackendError>) {
        if !self.generation.is_current(generation) {
            debug!(
                "Discarding stale state response (gen: {}, current: {})",
                generation,
                self.generation.current()
            );
            return;
        }
        self.reconciling = false;

        let state = match result {
            Ok(state) => state,
            Err(e) => {
                warn!("Could not load session state: {}", e);
                return;
            }
        };

        let history = &state.chat_history;
        let recovered = if history.is_empty() {
            Default::default()
        } else {
            self.transcript.rebuild(history)
        };

        if let Some(game_state) = &state.game_state {
            game_state.apply_to(&mut self.slots);
        }
        self.analysis
            .update(state.strategy.as_ref(), state.game_state.is_some());

        let pending = history.last().is_some_and(|turn| turn.role == Role::User);
        info!(
            "Reconciled {} turns from backend (pending: {})",
            history.len(),
            pending
        );
        if !pending {
            return;
        }

        // The last message was sent before the restart; show the cards it
        // carried rather than whatever the backend last parsed.
        if let Some(hero) = &recovered.hero {
            self.slots.replace_group(SlotGroup::Hero, hero);
        }
        if let Some(board) = &recovered.board {
            self.slots.replace_group(SlotGroup::Board, board);
        }

        let placeholder = self.transcript.push_loading();
        self.start_polling(history.len(), placeholder);
    }

    // -----------------------------------------------------------------------
    // Polling
    // -----------------------------------------------------------------------

    fn start_polling(&mut self, baseline: usize, placeholder: PlaceholderId) {
        self.cancel_polling();

        self.next_poll_id += 1;
        let id = self.next_poll_id;
        let generation = self.generation.begin_request();
        let period = self.polling_config.interval();
        let backend = Arc::clone(&self.backend);
        let tx = self.net_tx.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let result = backend.fetch_state().await;
                let event = NetEvent::PollTick {
                    generation,
                    poll_id: id,
                    result,
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });

        info!(
            "Polling for pending response (poll: {}, baseline: {})",
            id, baseline
        );
        self.poll = Some(Poll {
            id,
            baseline,
            placeholder,
            deadline: Instant::now() + self.polling_config.timeout(),
            task,
        });
    }

    /// Stop the polling loop, if any. Returns its placeholder.
    fn cancel_polling(&mut self) -> Option<PlaceholderId> {
        let poll = self.poll.take()?;
        poll.task.abort();
        info!("Polling stopped (poll: {})", poll.id);
        Some(poll.placeholder)
    }

    fn handle_poll_tick(
        &mut self,
        generation: u64,
        poll_id: u64,
        result: Result<StateResponse, BackendError>,
    ) {
        if !self.generation.is_current(generation) {
            debug!("Discarding stale poll result (gen: {})", generation);
            return;
        }
        let Some(poll) = self.poll.as_ref().filter(|p| p.id == poll_id) else {
            debug!("Discarding result from superseded poll {}", poll_id);
            return;
        };
        let baseline = poll.baseline;
        let deadline = poll.deadline;

        let state = match result {
            Ok(state) => state,
            Err(e) => {
                warn!("Polling failed: {}", e);
                self.stop_polling();
                self.transcript.append(
                    Role::Assistant,
                    format!("Lost contact with the backend while waiting: {e}"),
                );
                return;
            }
        };

        if state.chat_history.len() <= baseline {
            if Instant::now() >= deadline {
                warn!("No response after {:?}, giving up", self.polling_config.timeout());
                self.stop_polling();
                self.notice = Some(Notice::error(
                    "Stopped waiting for the pending response; send the question again",
                ));
            }
            return;
        }

        self.stop_polling();
        let mut appended = 0;
        for turn in &state.chat_history[baseline..] {
            if turn.role == Role::Assistant {
                self.transcript.append(Role::Assistant, turn.content.clone());
                appended += 1;
            }
        }
        info!("Pending response arrived ({} assistant turns)", appended);

        self.analysis
            .update(state.strategy.as_ref(), state.game_state.is_some());
        if let Some(game_state) = &state.game_state {
            game_state.apply_to(&mut self.slots);
        }
    }

    fn stop_polling(&mut self) {
        if let Some(placeholder) = self.cancel_polling() {
            self.transcript.remove_loading(placeholder);
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn handle_command(&mut self, cmd: UserCommand) {
        if self.shut_down {
            debug!("Ignoring {:?} after shutdown", cmd);
            return;
        }
        match cmd {
            UserCommand::SlotClicked(slot) => self.picker.open(slot),
            UserCommand::UserSelectedCard(card) => self.select_card(card),
            UserCommand::ClosePicker => self.picker.close(),
            UserCommand::ClearCards => {
                self.picker.clear(&mut self.slots);
                debug!("Cleared all card slots");
            }
            UserCommand::SubmitRequested(text) => self.submit(&text),
            UserCommand::ResetRequested => self.reset(),
            UserCommand::ShutdownRequested => self.shutdown(),
            UserCommand::Quit => {}
        }
    }

    fn select_card(&mut self, card: Card) {
        match self.picker.select(card, &mut self.slots) {
            Selection::Committed {
                slot,
                stolen_from: Some(from),
            } => debug!("Selected {} for {} (taken from {})", card, slot, from),
            Selection::Committed { slot, .. } => debug!("Selected {} for {}", card, slot),
            Selection::Ignored => {}
        }
    }

    fn submit(&mut self, text: &str) {
        if !self.input_enabled() {
            debug!("Submit ignored while input is disabled");
            return;
        }
        let cards = self.slots.snapshot();
        let Some(message) = codec::encode(&cards, text) else {
            debug!("Nothing to send");
            return;
        };

        let display = codec::decode(&message).display_text().to_string();
        self.transcript.append(Role::User, display);
        let placeholder = self.transcript.push_loading();
        self.pending_chat = Some(placeholder);
        self.notice = None;

        let generation = self.generation.begin_request();
        let request = ChatRequest {
            message,
            ui_state: cards.to_ui_state(),
        };
        let backend = Arc::clone(&self.backend);
        let tx = self.net_tx.clone();
        tokio::spawn(async move {
            let result = backend.chat(&request).await;
            let _ = tx
                .send(NetEvent::ChatCompleted {
                    generation,
                    placeholder,
                    result,
                })
                .await;
        });
        info!("Chat request sent (gen: {})", generation);
    }

    fn handle_chat_completed(
        &mut self,
        generation: u64,
        placeholder: PlaceholderId,
        result: Result<ChatResponse, BackendError>,
    ) {
        if !self.generation.is_current(generation) {
            debug!(
                "Discarding chat response from before reset (gen: {}, current: {})",
                generation,
                self.generation.current()
            );
            return;
        }

        self.transcript.remove_loading(placeholder);
        if self.pending_chat == Some(placeholder) {
            self.pending_chat = None;
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.transcript
                    .append(Role::Assistant, format!("Could not reach the backend: {e}"));
                return;
            }
        };

        if let Some(error) = response.error {
            info!("Backend reported an error: {}", error);
            self.transcript.append(Role::Assistant, error);
            return;
        }

        if let Some(advice) = response.advice.filter(|a| !a.is_empty()) {
            self.transcript.append(Role::Assistant, advice);
        }
        self.analysis
            .update(response.strategy.as_ref(), response.game_state.is_some());
        if let Some(game_state) = &response.game_state {
            game_state.apply_to(&mut self.slots);
        }
    }

    /// Start a fresh session. Everything issued before this point is stale.
    fn reset(&mut self) {
        let generation = self.generation.invalidate();
        self.cancel_polling();
        self.transcript.clear_loading();
        self.pending_chat = None;
        self.reconciling = false;
        self.notice = None;

        let backend = Arc::clone(&self.backend);
        let tx = self.net_tx.clone();
        tokio::spawn(async move {
            let result = backend.reset().await;
            let _ = tx
                .send(NetEvent::ResetCompleted { generation, result })
                .await;
        });
        info!("Reset requested (gen: {})", generation);
    }

    fn handle_reset_completed(&mut self, generation: u64, result: Result<(), BackendError>) {
        if !self.generation.is_current(generation) {
            debug!("Discarding superseded reset result (gen: {})", generation);
            return;
        }
        match result {
            Ok(()) => {
                self.transcript.clear();
                self.analysis.clear();
                self.picker.clear(&mut self.slots);
                self.notice = Some(Notice::info("Session cleared"));
                info!("Session reset");
            }
            Err(e) => {
                warn!("Reset failed: {}", e);
                self.notice = Some(Notice::error(format!("Reset failed: {e}")));
            }
        }
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
        self.cancel_polling();
        self.picker.close();
        self.notice = Some(Notice::info(
            "Backend shutdown requested; you can close this window",
        ));

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            match backend.shutdown().await {
                Ok(()) => info!("Backend acknowledged shutdown"),
                // The process usually exits before answering.
                Err(e) => debug!("Shutdown request ended with: {}", e),
            }
        });
    }

    // -----------------------------------------------------------------------
    // Network completions
    // -----------------------------------------------------------------------

    pub fn handle_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::StateLoaded { generation, result } => {
                self.handle_state_loaded(generation, result)
            }
            NetEvent::ChatCompleted {
                generation,
                placeholder,
                result,
            } => self.handle_chat_completed(generation, placeholder, result),
            NetEvent::ResetCompleted { generation, result } => {
                self.handle_reset_completed(generation, result)
            }
            NetEvent::PollTick {
                generation,
                poll_id,
                result,
            } => self.handle_poll_tick(generation, poll_id, result),
        }
    }

    /// Card in `slot`, for tests and logging.
    pub fn card_at(&self, slot: SlotId) -> Option<Card> {
        self.slots.get(slot)
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the session event loop.
///
/// Starts reconciliation, then processes user commands and network
/// completions one at a time, pushing a fresh snapshot through `ui_tx`
/// after each.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut net_rx: mpsc::Receiver<NetEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut session: Session,
) -> anyhow::Result<()> {
    info!("Session event loop started");

    session.begin_reconcile();
    publish(&session, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => session.handle_command(cmd),
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = net_rx.recv() => {
                match event {
                    Some(event) => session.handle_net_event(event),
                    None => {
                        info!("Network channel closed");
                        break;
                    }
                }
            }
        }

        publish(&session, &ui_tx).await;
    }

    session.cancel_polling();
    info!("Session event loop exiting");
    Ok(())
}

async fn publish(session: &Session, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(session.snapshot())))
        .await;
}
