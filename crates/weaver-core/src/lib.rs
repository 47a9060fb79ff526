pub mod config;
pub mod error;
pub mod game;
pub mod grid;

// Re-export main types
pub use error::{GridError, LayoutError};
pub use game::{GameSession, GameSnapshot, MovementGate, MovementIntent, SessionPhase, SignalOutcome};
pub use grid::{LayoutPayload, SpiderWeb, Vocabulary, END_WORD};

// Re-export shared vocabulary types from weaver-events for convenience
pub use weaver_events::{Cell, Direction, Mode};
