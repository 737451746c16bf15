//! Session runtime and authoritative tick loop

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::interval;
use tracing::{debug, info};
use uuid::Uuid;

use crate::util::time::{tick_duration, SNAPSHOT_EVERY_TICKS};
use crate::ws::protocol::{ClientMsg, ServerMsg};

use super::simulation::{Command, CommandOutcome, SimEvent, Simulation};
use super::snapshot::SnapshotBuilder;
use super::state::GameState;
use super::tuning::Tuning;

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session limit reached ({0} running)")]
    Full(usize),

    #[error("Session closed")]
    Closed,
}

/// Connection-side handle to a running session.
/// The session ends once every handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    pub seed: u64,
    input_tx: mpsc::Sender<ClientMsg>,
    events_tx: broadcast::Sender<ServerMsg>,
    state_rx: watch::Receiver<GameState>,
}

impl SessionHandle {
    /// Queue a client message for the next tick
    pub async fn send(&self, msg: ClientMsg) -> Result<(), SessionError> {
        self.input_tx.send(msg).await.map_err(|_| SessionError::Closed)
    }

    /// Latest committed state; never blocks
    pub fn state(&self) -> GameState {
        self.state_rx.borrow().clone()
    }

    /// Receive snapshots and events pushed by the session
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMsg> {
        self.events_tx.subscribe()
    }

    /// Push a message to this session's subscribers
    pub fn notify(&self, msg: ServerMsg) {
        if self.events_tx.send(msg).is_err() {
            debug!(session_id = %self.id, "No subscribers for notification");
        }
    }
}

/// Read-only registry view of a session
#[derive(Clone)]
struct SessionEntry {
    state_rx: watch::Receiver<GameState>,
}

/// Registry of all running sessions
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionEntry>,
    max_sessions: usize,
    /// Slots taken, reserved before the entry is inserted
    reserved: AtomicUsize,
    base_seed: Option<u64>,
    created: AtomicU64,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize, base_seed: Option<u64>) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions,
            reserved: AtomicUsize::new(0),
            base_seed,
            created: AtomicU64::new(0),
        }
    }

    /// Create and register a new session. The caller spawns `GameSession::run`.
    pub fn create(&self, tuning: Tuning) -> Result<(GameSession, SessionHandle), SessionError> {
        let max = self.max_sessions;
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |taken| {
                (taken < max).then_some(taken + 1)
            })
            .map_err(SessionError::Full)?;

        let n = self.created.fetch_add(1, Ordering::Relaxed);
        let seed = match self.base_seed {
            Some(base) => base.wrapping_add(n),
            None => rand::random(),
        };

        let (session, handle) = GameSession::new(Uuid::new_v4(), seed, tuning);
        self.sessions.insert(
            handle.id,
            SessionEntry {
                state_rx: handle.state_rx.clone(),
            },
        );

        Ok((session, handle))
    }

    /// Latest state of a session, if it is still running
    pub fn state(&self, id: &Uuid) -> Option<GameState> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().state_rx.borrow().clone())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            self.reserved.fetch_sub(1, Ordering::AcqRel);
        }
        removed
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

/// Spawn a session task that unregisters itself when it ends
pub fn spawn_session(registry: Arc<SessionRegistry>, session: GameSession) {
    tokio::spawn(async move {
        let id = session.id;
        session.run().await;
        registry.remove(&id);
    });
}

/// One player's authoritative simulation
pub struct GameSession {
    id: Uuid,
    sim: Simulation,
    input_rx: mpsc::Receiver<ClientMsg>,
    events_tx: broadcast::Sender<ServerMsg>,
    state_tx: watch::Sender<GameState>,
    snapshot_builder: SnapshotBuilder,
}

impl GameSession {
    /// Create a new session
    pub fn new(id: Uuid, seed: u64, tuning: Tuning) -> (Self, SessionHandle) {
        let (input_tx, input_rx) = mpsc::channel(256);
        let (events_tx, _) = broadcast::channel(64);
        let sim = Simulation::new(seed, tuning);
        let (state_tx, state_rx) = watch::channel(sim.state().clone());

        let handle = SessionHandle {
            id,
            seed,
            input_tx,
            events_tx: events_tx.clone(),
            state_rx,
        };

        let session = Self {
            id,
            sim,
            input_rx,
            events_tx,
            state_tx,
            snapshot_builder: SnapshotBuilder::new(SNAPSHOT_EVERY_TICKS),
        };

        (session, handle)
    }

    /// Run the authoritative tick loop until every handle is dropped
    pub async fn run(mut self) {
        info!(session_id = %self.id, seed = self.sim.seed(), "Session started");

        let mut tick_interval = interval(tick_duration(self.sim.tuning().tick_ms));
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            // Drain input queue
            let connected = self.process_inputs();
            if !connected {
                break;
            }

            // Run simulation tick
            self.run_tick();
        }

        // Dropping the simulation discards any armed fishing timer
        if let Some(remaining_ms) = self.sim.fishing_remaining_ms() {
            info!(
                session_id = %self.id,
                remaining_ms,
                "Session ended with a catch attempt in flight, discarding it"
            );
        }
        info!(
            session_id = %self.id,
            ticks = self.sim.tick_count(),
            score = self.sim.state().score,
            "Session ended"
        );
    }

    /// Apply all pending client messages. Returns false once every sender is gone.
    fn process_inputs(&mut self) -> bool {
        loop {
            match self.input_rx.try_recv() {
                Ok(msg) => self.handle_msg(msg),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn handle_msg(&mut self, msg: ClientMsg) {
        let Some(command) = msg.command() else {
            if let ClientMsg::Ping { t } = msg {
                self.emit(ServerMsg::Pong { t });
            }
            return;
        };

        match self.sim.apply(command) {
            CommandOutcome::Accepted => {
                debug!(session_id = %self.id, ?command, "Command accepted");
                if let (Command::Fish, Some(duration_ms)) =
                    (command, self.sim.fishing_remaining_ms())
                {
                    info!(
                        session_id = %self.id,
                        duration_ms,
                        depth = self.sim.state().depth,
                        "Line cast"
                    );
                    self.emit(ServerMsg::FishingStarted { duration_ms });
                    self.snapshot_builder.force_next();
                }
            }
            CommandOutcome::Rejected(reason) => {
                debug!(session_id = %self.id, ?command, ?reason, "Command ignored");
            }
        }

        self.publish_state();
    }

    /// Run a single simulation tick
    fn run_tick(&mut self) {
        for event in self.sim.tick() {
            let msg = match event {
                SimEvent::FishCaught { fish } => {
                    info!(
                        session_id = %self.id,
                        fish_id = fish.id,
                        species = ?fish.species,
                        points = fish.points,
                        "Fish caught"
                    );
                    ServerMsg::FishCaught { fish }
                }
                SimEvent::FishMissed => {
                    info!(session_id = %self.id, "Fish got away");
                    ServerMsg::FishMissed
                }
            };
            self.emit(msg);
            self.snapshot_builder.force_next();
        }

        self.publish_state();

        if self.snapshot_builder.should_send() {
            let snapshot = self
                .snapshot_builder
                .build(self.sim.tick_count(), self.sim.state());
            self.emit(snapshot);
        }
    }

    /// Broadcast to the connection; a missing subscriber is not an error
    fn emit(&self, msg: ServerMsg) {
        if self.events_tx.send(msg).is_err() {
            debug!(session_id = %self.id, "No subscribers for session event");
        }
    }

    /// Expose the latest committed state to readers
    fn publish_state(&self) {
        let state = self.sim.state();
        self.state_tx.send_if_modified(|current| {
            if *current != *state {
                *current = state.clone();
                true
            } else {
                false
            }
        });
    }
}
