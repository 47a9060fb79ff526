use serde::{Deserialize, Serialize};

use crate::input::Direction;
use crate::{Cell, Mode};

/// Events emitted by the game session as play progresses
///
/// Renderers redraw from these, the speech collaborator speaks collected
/// words, and message labels display the notices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh session is ready to play
    SessionStarted {
        mode: Mode,
        rows: usize,
        cols: usize,
    },
    /// The session was reset to a fresh web after a win or manual restart
    SessionRestarted {
        mode: Mode,
    },
    /// First signal received - the avatar leans toward `direction` awaiting
    /// confirmation, no grid mutation yet
    MoveArmed {
        direction: Direction,
        from: Cell,
    },
    /// A signal in a different direction discarded the armed intent and
    /// armed the new direction instead
    MoveRearmed {
        previous: Direction,
        direction: Direction,
    },
    /// Confirmed move would leave the web; intent discarded
    MoveBlocked {
        direction: Direction,
    },
    /// Confirmed move committed
    PlayerMoved {
        to: Cell,
    },
    /// A word was collected from the cell the player landed on
    WordCollected {
        word: String,
        cell: Cell,
        points: u32,
        total_score: u32,
    },
    /// Player reached the END cell with words still on the web
    EndReachedEarly {
        remaining: usize,
    },
    /// Player reached the END cell with every word collected
    GameWon {
        score: u32,
        category: String,
    },
    /// A category guess transcript came back from the speech collaborator
    GuessReceived {
        guess: String,
        answer: String,
    },
}
