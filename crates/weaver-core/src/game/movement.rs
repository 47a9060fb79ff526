use weaver_events::{Cell, Direction};

use crate::grid::SpiderWeb;

/// Movement intent between signals
///
/// Physical triggers are noisy, so a move needs two signals in the same
/// direction before it commits. The intent lives only across those two
/// signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementIntent {
    Idle,
    /// One signal received, awaiting confirmation
    Armed(Direction),
}

/// What one signal did to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// First signal: armed, renderer shows the midpoint cue
    Armed { direction: Direction },
    /// Signal in a different direction while armed: the stale intent is
    /// discarded and the new direction armed instead
    Rearmed {
        previous: Direction,
        direction: Direction,
    },
    /// Second matching signal with an in-bounds target: commit the move
    Confirmed { target: Cell },
    /// Second matching signal but the target leaves the web
    Blocked { direction: Direction },
}

/// Double-confirmation gate between raw signals and grid moves
///
/// Synchronous and single-threaded: exactly one signal is processed at a
/// time. The caller (the session task) serializes delivery.
#[derive(Debug, Clone, Copy)]
pub struct MovementGate {
    intent: MovementIntent,
}

impl MovementGate {
    pub fn new() -> Self {
        Self {
            intent: MovementIntent::Idle,
        }
    }

    pub fn intent(&self) -> MovementIntent {
        self.intent
    }

    /// Drop any armed intent
    pub fn reset(&mut self) {
        self.intent = MovementIntent::Idle;
    }

    /// Feed one directional signal through the gate
    ///
    /// Bounds are evaluated at confirmation time against the web's current
    /// player position. Both a committed and a blocked confirmation return
    /// the gate to Idle.
    pub fn signal(&mut self, direction: Direction, web: &SpiderWeb) -> SignalOutcome {
        match self.intent {
            MovementIntent::Idle => {
                self.intent = MovementIntent::Armed(direction);
                SignalOutcome::Armed { direction }
            }
            MovementIntent::Armed(armed) if armed == direction => {
                self.intent = MovementIntent::Idle;
                match web.target_from(web.player(), direction) {
                    Some(target) => SignalOutcome::Confirmed { target },
                    None => SignalOutcome::Blocked { direction },
                }
            }
            MovementIntent::Armed(previous) => {
                self.intent = MovementIntent::Armed(direction);
                SignalOutcome::Rearmed {
                    previous,
                    direction,
                }
            }
        }
    }
}

impl Default for MovementGate {
    fn default() -> Self {
        Self::new()
    }
}
