use crate::input::{Direction, SignalSource};

/// Commands marshaled onto the session task
///
/// Every external execution context (key input, collision triggers, the
/// speech collaborator) talks to the game through this single queue, so no
/// two commands ever touch the session concurrently.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// A raw directional signal for the movement gate
    Signal {
        direction: Direction,
        source: SignalSource,
    },
    /// Tear down the current web and start a fresh one in the session's mode
    Restart,
    /// Category guess transcript, display-only (offline mode)
    SubmitGuess {
        transcript: String,
    },
    /// Stop the session task
    Shutdown,
}
