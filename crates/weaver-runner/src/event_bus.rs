// Event bus infrastructure for the weaver session system
// The runner owns the bus; front-ends and cue sinks subscribe

use std::time::Instant;

use tokio::sync::broadcast;
use weaver_events::{GameEvent, Mode, SignalSource};

/// Where an event originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Keyboard or on-screen button signal
    Button,
    /// Physical collision trigger from the tracking layer
    Collision,
    /// Layout server response
    Network,
    /// Session lifecycle
    System,
}

impl From<SignalSource> for EventSource {
    fn from(source: SignalSource) -> Self {
        match source {
            SignalSource::Button => EventSource::Button,
            SignalSource::Collision => EventSource::Collision,
        }
    }
}

/// Context attached to every event
#[derive(Debug, Clone, Copy)]
pub struct EventContext {
    /// ID of the session that produced this event
    pub session_id: u32,
    /// Initialization generation; bumped on every restart. Consumers can
    /// drop events from generations they no longer care about.
    pub epoch: u64,
    /// Per-session ordering sequence
    pub sequence: u64,
}

/// Session lifecycle events
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Initialization in the given mode has begun
    InitStarted { mode: Mode },
    /// Initialization finished and the session is playable
    InitCompleted { mode: Mode },
    /// Online initialization failed; a generated web is in use instead
    FellBackOffline { reason: String },
    /// A superseded layout response arrived and was dropped. Diagnostic
    /// only; front-ends do not display this.
    StaleLayoutDiscarded { stale_epoch: u64 },
    /// The session task is stopping
    Shutdown,
}

/// Unified event type on the bus
#[derive(Debug, Clone)]
pub enum EventType {
    Game(GameEvent),
    System(SystemEvent),
}

/// Complete event envelope
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub event: EventType,
    pub context: EventContext,
    pub timestamp: Instant,
    pub source: EventSource,
}

impl EventEnvelope {
    pub fn new(event: EventType, context: EventContext, source: EventSource) -> Self {
        Self {
            event,
            context,
            timestamp: Instant::now(),
            source,
        }
    }

    pub fn extract_game_event(&self) -> Option<GameEvent> {
        match &self.event {
            EventType::Game(game_event) => Some(game_event.clone()),
            _ => None,
        }
    }
}

/// Central event bus that manages event distribution
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<EventEnvelope>) {
        let (sender, receiver) = broadcast::channel(capacity);
        (EventBus { sender }, receiver)
    }

    /// Publish an event to the bus
    pub fn publish(&self, envelope: EventEnvelope) {
        // Ignore errors if there are no subscribers
        let _ = self.sender.send(envelope);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
