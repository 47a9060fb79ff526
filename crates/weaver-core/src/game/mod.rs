// Re-export main types
pub use self::movement::{MovementGate, MovementIntent, SignalOutcome};
pub use self::session::{GameSession, GameSnapshot, SessionPhase};

mod movement;
mod session;
