//! Keyboard mapping for the terminal front-end
//!
//! Arrow keys (and WASD) stand in for physical control-zone triggers;
//! everything maps to the source-agnostic signal types.

use crossterm::event::KeyCode;
use weaver_events::Direction;

/// Map a key to a directional signal, if it is one
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}
