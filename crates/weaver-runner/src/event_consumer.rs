use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;
use weaver_events::{Cue, CueSink, GameEvent};

use crate::event_bus::{EventEnvelope, EventSource, EventType};

/// Trait for consuming session events - allows different front-ends to hang
/// off the same bus
pub trait EventConsumer: Send + 'static {
    /// Handle an event envelope
    fn handle_event(&mut self, envelope: EventEnvelope);
}

/// Simple event consumer that logs all events (for debugging and headless
/// runs)
pub struct LoggingConsumer;

impl EventConsumer for LoggingConsumer {
    fn handle_event(&mut self, envelope: EventEnvelope) {
        match envelope.event {
            EventType::Game(game_event) => {
                tracing::debug!(target: "events", "Game Event: {:?}", game_event);
            }
            EventType::System(system_event) => {
                tracing::info!(target: "events", "System Event: {:?}", system_event);
            }
        }
    }
}

/// Forwards cue-worthy events to the audio/speech collaborator
///
/// Collision-sourced signals get a hit cue, collected words are spoken, and
/// a win plays the win cue. All fire-and-forget.
pub struct CueConsumer {
    sink: Box<dyn CueSink>,
}

impl CueConsumer {
    pub fn new(sink: Box<dyn CueSink>) -> Self {
        Self { sink }
    }
}

impl EventConsumer for CueConsumer {
    fn handle_event(&mut self, envelope: EventEnvelope) {
        let game_event = match &envelope.event {
            EventType::Game(game_event) => game_event,
            EventType::System(_) => return,
        };
        match game_event {
            GameEvent::MoveArmed { .. }
            | GameEvent::MoveRearmed { .. }
            | GameEvent::MoveBlocked { .. }
            | GameEvent::PlayerMoved { .. } => {
                if envelope.source == EventSource::Collision {
                    self.sink.play(Cue::Collision);
                }
            }
            GameEvent::WordCollected { word, .. } => {
                self.sink.speak(word);
            }
            GameEvent::GameWon { .. } => {
                self.sink.play(Cue::Win);
            }
            _ => {}
        }
    }
}

/// Tracing-backed sink, standing in for the platform audio/speech
/// collaborator
pub struct LoggingCueSink;

impl CueSink for LoggingCueSink {
    fn play(&mut self, cue: Cue) {
        tracing::info!(target: "cues", "Playing cue: {:?}", cue);
    }

    fn speak(&mut self, text: &str) {
        tracing::info!(target: "cues", "Speaking: {}", text);
    }
}

/// Spawn a task that drains a bus subscription into a consumer
pub fn spawn_consumer(
    mut receiver: broadcast::Receiver<EventEnvelope>,
    mut consumer: Box<dyn EventConsumer>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(envelope) => consumer.handle_event(envelope),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(target: "events", "Consumer lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
