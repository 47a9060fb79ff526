use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// A directional movement signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row/column delta for one step in this direction
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Where a directional signal came from
///
/// The game treats both the same; consumers use the source to decide which
/// cue to play (a physical collision gets a hit sound, a button press does
/// not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSource {
    /// On-screen or keyboard button
    Button,
    /// Physical collision trigger from the tracking layer
    Collision,
}
