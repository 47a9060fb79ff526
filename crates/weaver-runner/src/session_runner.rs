use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use weaver_core::config::{GameConfig, ServerConfig};
use weaver_core::{GameSession, GameSnapshot, LayoutPayload, Mode, Vocabulary};
use weaver_events::{Direction, GameEvent, SessionCommand, SignalSource};

use crate::event_bus::{
    EventBus, EventContext, EventEnvelope, EventSource, EventType, SystemEvent,
};
use crate::layout_client::{FetchError, LayoutClient};

const EVENT_BUS_CAPACITY: usize = 256;

/// Configuration for running one session
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub session_id: u32,
    /// Requested mode; a restart always retries this mode even after an
    /// offline fallback
    pub mode: Mode,
    pub server: Option<ServerConfig>,
    pub game: GameConfig,
}

impl RunnerConfig {
    /// Config for a locally generated session
    pub fn offline(session_id: u32) -> Self {
        Self {
            session_id,
            mode: Mode::Offline,
            server: None,
            game: GameConfig::default(),
        }
    }

    /// Config for a server-supplied session
    pub fn online(session_id: u32, server: ServerConfig) -> Self {
        Self {
            session_id,
            mode: Mode::Online,
            server: Some(server),
            game: GameConfig::default(),
        }
    }

    /// Override the offline generation tunables
    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }
}

/// A layout fetch handing its result back to the session task
#[derive(Debug)]
struct LayoutResult {
    /// Epoch the fetch was issued under; stale results are discarded
    epoch: u64,
    result: Result<LayoutPayload, FetchError>,
}

/// Handle to a running session task
///
/// Dropping every handle ends the task; teardown never touches game
/// outcome.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    bus: Arc<EventBus>,
    snapshots: watch::Receiver<Option<GameSnapshot>>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Command sender for marshaling external events onto the session task
    pub fn commands(&self) -> mpsc::UnboundedSender<SessionCommand> {
        self.commands.clone()
    }

    /// Subscribe to the session's event bus
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.bus.subscribe()
    }

    /// Watch channel of renderable snapshots; None while initializing
    pub fn snapshots(&self) -> watch::Receiver<Option<GameSnapshot>> {
        self.snapshots.clone()
    }

    /// Queue a directional signal
    pub fn signal(&self, direction: Direction, source: SignalSource) {
        self.send(SessionCommand::Signal { direction, source });
    }

    /// Queue a restart
    pub fn restart(&self) {
        self.send(SessionCommand::Restart);
    }

    /// Queue a category guess transcript
    pub fn submit_guess(&self, transcript: String) {
        self.send(SessionCommand::SubmitGuess { transcript });
    }

    /// Ask the session task to stop
    pub fn shutdown(&self) {
        self.send(SessionCommand::Shutdown);
    }

    fn send(&self, command: SessionCommand) {
        if self.commands.send(command).is_err() {
            warn!(target: "runner", "Session task is gone, command dropped");
        }
    }

    /// Wait for the session task to finish
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Publishes enriched envelopes with session context
struct Publisher {
    bus: Arc<EventBus>,
    session_id: u32,
    sequence: u64,
}

impl Publisher {
    fn publish(&mut self, epoch: u64, event: EventType, source: EventSource) {
        let context = EventContext {
            session_id: self.session_id,
            epoch,
            sequence: self.sequence,
        };
        self.sequence += 1;
        self.bus.publish(EventEnvelope::new(event, context, source));
    }

    fn game(&mut self, epoch: u64, event: GameEvent, source: EventSource) {
        self.publish(epoch, EventType::Game(event), source);
    }

    fn system(&mut self, epoch: u64, event: SystemEvent, source: EventSource) {
        self.publish(epoch, EventType::System(event), source);
    }
}

/// Spawn the session task: the single logical thread of game-state mutation
///
/// Every external execution context reaches the session through the
/// handle's command queue, so commands are applied strictly one at a time.
pub fn spawn_session(config: RunnerConfig) -> SessionHandle {
    let (bus, _) = EventBus::new(EVENT_BUS_CAPACITY);
    let bus = Arc::new(bus);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (layout_tx, layout_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(None);

    let client = config.server.clone().map(LayoutClient::new);
    let task = SessionTask {
        publisher: Publisher {
            bus: bus.clone(),
            session_id: config.session_id,
            sequence: 0,
        },
        snapshot_tx,
        vocabulary: Vocabulary::builtin(),
        rng: StdRng::from_entropy(),
        client,
        layout_tx,
        epoch: 0,
        session: None,
        started_once: false,
        config,
    };
    let join = tokio::spawn(run_session(task, command_rx, layout_rx));

    SessionHandle {
        commands: command_tx,
        bus,
        snapshots: snapshot_rx,
        task: join,
    }
}

async fn run_session(
    mut task: SessionTask,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    mut layout_rx: mpsc::UnboundedReceiver<LayoutResult>,
) {
    info!(
        target: "runner",
        "Session {} starting ({:?})",
        task.config.session_id, task.config.mode
    );
    task.start_init();

    loop {
        tokio::select! {
            Some(result) = layout_rx.recv() => task.resolve_layout(result),
            command = command_rx.recv() => match command {
                Some(command) => {
                    if !task.handle_command(command) {
                        break;
                    }
                }
                // Every handle is gone
                None => break,
            },
        }
    }
    info!(target: "runner", "Session {} stopped", task.config.session_id);
}

struct SessionTask {
    config: RunnerConfig,
    publisher: Publisher,
    snapshot_tx: watch::Sender<Option<GameSnapshot>>,
    vocabulary: Vocabulary,
    rng: StdRng,
    client: Option<LayoutClient>,
    layout_tx: mpsc::UnboundedSender<LayoutResult>,
    /// Initialization generation; bumped on every restart so superseded
    /// layout responses can be recognized and dropped
    epoch: u64,
    /// None while an online initialization is outstanding
    session: Option<GameSession>,
    started_once: bool,
}

impl SessionTask {
    fn start_init(&mut self) {
        match self.config.mode {
            Mode::Online => self.begin_online_init(),
            Mode::Offline => {
                self.publisher.system(
                    self.epoch,
                    SystemEvent::InitStarted {
                        mode: Mode::Offline,
                    },
                    EventSource::System,
                );
                self.start_offline();
            }
        }
    }

    fn begin_online_init(&mut self) {
        self.publisher.system(
            self.epoch,
            SystemEvent::InitStarted { mode: Mode::Online },
            EventSource::System,
        );
        match &self.client {
            Some(client) => {
                // Gameplay pauses until the layout resolves; signals that
                // arrive in the meantime are dropped
                self.session = None;
                self.push_snapshot();

                let client = client.clone();
                let results = self.layout_tx.clone();
                let epoch = self.epoch;
                tokio::spawn(async move {
                    let result = client.fetch().await;
                    // The session may have moved on; it checks the epoch
                    let _ = results.send(LayoutResult { epoch, result });
                });
            }
            None => {
                warn!(
                    target: "runner",
                    "Online mode requested without a layout server; playing offline"
                );
                self.fall_back_offline("no layout server configured".to_string());
            }
        }
    }

    /// Create or reset the offline session and announce it
    fn start_offline(&mut self) {
        match &mut self.session {
            Some(session) => {
                session.restart_offline(&self.vocabulary, &self.config.game, &mut self.rng)
            }
            None => {
                self.session = Some(GameSession::offline(
                    &self.vocabulary,
                    &self.config.game,
                    &mut self.rng,
                ))
            }
        }
        self.publisher.system(
            self.epoch,
            SystemEvent::InitCompleted {
                mode: Mode::Offline,
            },
            EventSource::System,
        );
        self.publish_session_ready(Mode::Offline, EventSource::System);
        self.push_snapshot();
    }

    /// Announce a playable web: SessionStarted the first time, restarts
    /// after that
    fn publish_session_ready(&mut self, mode: Mode, source: EventSource) {
        let (rows, cols) = match &self.session {
            Some(session) => (session.web().rows(), session.web().cols()),
            None => return,
        };
        let event = if self.started_once {
            GameEvent::SessionRestarted { mode }
        } else {
            GameEvent::SessionStarted { mode, rows, cols }
        };
        self.started_once = true;
        self.publisher.game(self.epoch, event, source);
    }

    fn fall_back_offline(&mut self, reason: String) {
        self.publisher.system(
            self.epoch,
            SystemEvent::FellBackOffline { reason },
            EventSource::Network,
        );
        self.start_offline();
    }

    fn resolve_layout(&mut self, incoming: LayoutResult) {
        if incoming.epoch != self.epoch {
            debug!(
                target: "runner",
                "Discarding stale layout from epoch {} (current {})",
                incoming.epoch, self.epoch
            );
            self.publisher.system(
                self.epoch,
                SystemEvent::StaleLayoutDiscarded {
                    stale_epoch: incoming.epoch,
                },
                EventSource::Network,
            );
            return;
        }

        let payload = match incoming.result {
            Ok(payload) => payload,
            Err(e) => {
                warn!(target: "runner", "Layout fetch failed: {}", e);
                self.fall_back_offline(e.to_string());
                return;
            }
        };

        let adopted = match self.session.take() {
            Some(mut session) => session.restart_online(&payload).map(|_| session),
            None => GameSession::online(&payload),
        };
        match adopted {
            Ok(session) => {
                self.session = Some(session);
                self.publisher.system(
                    self.epoch,
                    SystemEvent::InitCompleted { mode: Mode::Online },
                    EventSource::Network,
                );
                self.publish_session_ready(Mode::Online, EventSource::Network);
                self.push_snapshot();
            }
            Err(e) => {
                warn!(target: "runner", "Server layout rejected: {}", e);
                self.fall_back_offline(e.to_string());
            }
        }
    }

    /// Returns false when the task should stop
    fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Signal { direction, source } => self.handle_signal(direction, source),
            SessionCommand::Restart => self.restart(),
            SessionCommand::SubmitGuess { transcript } => self.submit_guess(transcript),
            SessionCommand::Shutdown => {
                self.publisher
                    .system(self.epoch, SystemEvent::Shutdown, EventSource::System);
                return false;
            }
        }
        true
    }

    fn handle_signal(&mut self, direction: Direction, source: SignalSource) {
        match &mut self.session {
            Some(session) => {
                let events = session.handle_signal(direction);
                let source = EventSource::from(source);
                let moved = events
                    .iter()
                    .any(|e| !matches!(e, GameEvent::MoveArmed { .. } | GameEvent::MoveRearmed { .. }));
                for event in events {
                    self.publisher.game(self.epoch, event, source);
                }
                if moved {
                    self.push_snapshot();
                }
            }
            None => {
                debug!(
                    target: "runner",
                    "Dropping {} signal, session is initializing", direction
                );
            }
        }
    }

    fn restart(&mut self) {
        self.epoch += 1;
        info!(target: "runner", "Restart requested (epoch {})", self.epoch);
        self.start_init();
    }

    fn submit_guess(&mut self, transcript: String) {
        match &self.session {
            Some(session) if session.is_won() => {
                let answer = session.web().category().to_string();
                self.publisher.game(
                    self.epoch,
                    GameEvent::GuessReceived {
                        guess: transcript,
                        answer,
                    },
                    EventSource::System,
                );
            }
            _ => debug!(target: "runner", "Ignoring guess, session is not won"),
        }
    }

    fn push_snapshot(&self) {
        let _ = self
            .snapshot_tx
            .send(self.session.as_ref().map(|s| s.snapshot()));
    }
}
