//! Core event and signal types for weaver
//!
//! This crate provides the foundational vocabulary shared by the game core,
//! the runner and the front-ends, allowing each to be implemented without
//! circular dependencies.

use serde::{Deserialize, Serialize};

pub mod cues;
pub mod game_events;
pub mod input;
pub mod session_commands;

pub use cues::{Cue, CueSink};
pub use game_events::GameEvent;
pub use input::{Direction, SignalSource};
pub use session_commands::SessionCommand;

/// A cell address on the web, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbor cell one step in `direction`, or None if the step would
    /// leave the top or left edge. The grid checks the bottom/right edges
    /// since those depend on its extents.
    pub fn step(&self, direction: Direction) -> Option<Cell> {
        let (d_row, d_col) = direction.delta();
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Cell { row, col })
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// How the current session was initialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Web generated locally from the built-in vocabulary
    Offline,
    /// Web supplied by the layout server
    Online,
}
