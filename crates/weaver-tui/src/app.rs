use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use weaver_core::{GameSnapshot, Mode, SessionPhase};
use weaver_events::{GameEvent, SignalSource};
use weaver_runner::{EventEnvelope, EventType, SessionHandle, SystemEvent};

const MAX_MESSAGES: usize = 6;

/// TUI state: the latest snapshot plus the message log and input modes
pub struct App {
    pub snapshot: Option<GameSnapshot>,
    pub messages: VecDeque<String>,
    /// Some while the player is typing a category guess
    pub guess_input: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            messages: VecDeque::new(),
            guess_input: None,
            should_quit: false,
        }
    }

    pub fn push_message(&mut self, message: String) {
        if self.messages.len() == MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    fn is_won(&self) -> bool {
        matches!(
            self.snapshot.as_ref().map(|s| s.phase),
            Some(SessionPhase::Won)
        )
    }

    pub fn handle_key(&mut self, key: KeyEvent, handle: &SessionHandle) {
        // Guess entry grabs the keyboard until submitted or cancelled
        if let Some(input) = &mut self.guess_input {
            match key.code {
                KeyCode::Enter => {
                    let guess = input.clone();
                    self.guess_input = None;
                    if !guess.is_empty() {
                        handle.submit_guess(guess);
                    }
                }
                KeyCode::Esc => {
                    self.guess_input = None;
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => {
                    if !key.modifiers.contains(KeyModifiers::CONTROL) {
                        input.push(c);
                    }
                }
                _ => {}
            }
            return;
        }

        if let Some(direction) = crate::keyboard::direction_for(key.code) {
            handle.signal(direction, SignalSource::Button);
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                handle.restart();
            }
            KeyCode::Char('g') => {
                // Guessing the category only makes sense on the win screen
                if self.is_won() {
                    self.guess_input = Some(String::new());
                }
            }
            _ => {}
        }
    }

    pub fn update_from_envelope(&mut self, envelope: &EventEnvelope) {
        match &envelope.event {
            EventType::Game(game_event) => self.update_from_game_event(game_event),
            EventType::System(system_event) => self.update_from_system_event(system_event),
        }
    }

    fn update_from_game_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SessionStarted { .. } | GameEvent::SessionRestarted { .. } => {
                self.push_message("Ready!".to_string());
            }
            GameEvent::MoveBlocked { direction } => {
                self.push_message(format!("Out of bounds. Move {}", direction));
            }
            GameEvent::WordCollected { word, points, .. } => {
                self.push_message(format!("Collected {} (+{})", word, points));
            }
            GameEvent::EndReachedEarly { remaining } => {
                self.push_message(format!("Collect all words ({} left)", remaining));
            }
            GameEvent::GameWon { score, .. } => {
                self.push_message(format!("Congratulations! Score - {}", score));
            }
            GameEvent::GuessReceived { guess, answer } => {
                self.push_message(format!("Your guess: {}", guess));
                self.push_message(format!("Answer: {}", answer));
            }
            // Armed/rearmed/moved feedback is visible on the grid itself
            _ => {}
        }
    }

    fn update_from_system_event(&mut self, event: &SystemEvent) {
        match event {
            SystemEvent::InitStarted { mode: Mode::Online } => {
                self.push_message("Connecting...".to_string());
            }
            SystemEvent::InitStarted {
                mode: Mode::Offline,
            } => {
                self.push_message("Loading...".to_string());
            }
            SystemEvent::FellBackOffline { .. } => {
                self.push_message("Error connecting. Offline.".to_string());
            }
            _ => {}
        }
    }
}
