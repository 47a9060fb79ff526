use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use weaver_events::{Cell, Direction, GameEvent, Mode};

use crate::config::GameConfig;
use crate::error::LayoutError;
use crate::game::movement::{MovementGate, SignalOutcome};
use crate::grid::{generate_offline, web_from_layout, LayoutPayload, SpiderWeb, Vocabulary, END_WORD};

/// Session-level phase
///
/// Won is terminal until a restart: directional signals are ignored while
/// the win screen is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    Won,
}

/// One play session: the web plus collection state and the movement gate
///
/// Owned by exactly one control flow (the runner task); all mutation happens
/// through `handle_signal`, `apply_move` and the restart methods.
#[derive(Debug)]
pub struct GameSession {
    web: SpiderWeb,
    mode: Mode,
    gate: MovementGate,
    collected: Vec<String>,
    score: u32,
    phase: SessionPhase,
}

impl GameSession {
    /// Fresh session with a locally generated web
    pub fn offline(vocabulary: &Vocabulary, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let web = generate_offline(vocabulary, config, rng);
        info!(
            target: "session",
            "Offline session ready: {}x{}, {} words",
            web.rows(), web.cols(), web.path().len() - 1
        );
        Self::from_web(web, Mode::Offline)
    }

    /// Fresh session from a validated server layout
    pub fn online(payload: &LayoutPayload) -> Result<Self, LayoutError> {
        let web = web_from_layout(payload)?;
        info!(
            target: "session",
            "Online session ready: {}x{}, {} words",
            web.rows(), web.cols(), web.path().len() - 1
        );
        Ok(Self::from_web(web, Mode::Online))
    }

    fn from_web(web: SpiderWeb, mode: Mode) -> Self {
        Self {
            web,
            mode,
            gate: MovementGate::new(),
            collected: Vec::new(),
            score: 0,
            phase: SessionPhase::Playing,
        }
    }

    pub fn web(&self) -> &SpiderWeb {
        &self.web
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn collected_words(&self) -> &[String] {
        &self.collected
    }

    pub fn is_won(&self) -> bool {
        self.phase == SessionPhase::Won
    }

    /// Feed one directional signal through the movement gate
    ///
    /// Returns the events the signal produced, in order. Signals are ignored
    /// while the session is won.
    pub fn handle_signal(&mut self, direction: Direction) -> Vec<GameEvent> {
        if self.is_won() {
            debug!(target: "session", "Ignoring {} signal, session is won", direction);
            return Vec::new();
        }
        match self.gate.signal(direction, &self.web) {
            SignalOutcome::Armed { direction } => vec![GameEvent::MoveArmed {
                direction,
                from: self.web.player(),
            }],
            SignalOutcome::Rearmed {
                previous,
                direction,
            } => vec![GameEvent::MoveRearmed {
                previous,
                direction,
            }],
            SignalOutcome::Blocked { direction } => {
                debug!(target: "session", "Blocked: moving {} leaves the web", direction);
                vec![GameEvent::MoveBlocked { direction }]
            }
            SignalOutcome::Confirmed { target } => self.apply_move(target),
        }
    }

    /// Commit a confirmed, in-bounds move and collect whatever the player
    /// lands on
    pub fn apply_move(&mut self, target: Cell) -> Vec<GameEvent> {
        if !self.web.in_bounds(target.row, target.col) {
            debug!(target: "session", "Dropping move to out-of-bounds cell {}", target);
            return Vec::new();
        }
        self.web.set_player(target);
        let mut events = vec![GameEvent::PlayerMoved { to: target }];

        if !self.web.is_on_path(target.row, target.col) {
            return events;
        }
        let word = match self.web.word_at(target.row, target.col) {
            Ok(Some(w)) => w.to_string(),
            // Already collected or never occupied
            _ => return events,
        };

        if word == END_WORD {
            let needed = self.web.path().len() - 1;
            if self.collected.len() == needed {
                // Bounds were checked above
                let _ = self.web.clear_word(target.row, target.col);
                self.phase = SessionPhase::Won;
                info!(target: "session", "Session won with score {}", self.score);
                events.push(GameEvent::GameWon {
                    score: self.score,
                    category: self.web.category().to_string(),
                });
            } else {
                events.push(GameEvent::EndReachedEarly {
                    remaining: needed - self.collected.len(),
                });
            }
        } else {
            let points = self.web.score_at(target.row, target.col).unwrap_or(0);
            let _ = self.web.clear_word(target.row, target.col);
            self.collected.push(word.clone());
            self.score += points;
            debug!(
                target: "session",
                "Collected {:?} for {} points (total {})",
                word, points, self.score
            );
            events.push(GameEvent::WordCollected {
                word,
                cell: target,
                points,
                total_score: self.score,
            });
        }
        events
    }

    /// Replace the web with a freshly generated one and reset all
    /// collection state
    pub fn restart_offline(
        &mut self,
        vocabulary: &Vocabulary,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) {
        let web = generate_offline(vocabulary, config, rng);
        self.reset_with(web, Mode::Offline);
    }

    /// Replace the web with a validated server layout and reset all
    /// collection state
    pub fn restart_online(&mut self, payload: &LayoutPayload) -> Result<(), LayoutError> {
        let web = web_from_layout(payload)?;
        self.reset_with(web, Mode::Online);
        Ok(())
    }

    fn reset_with(&mut self, mut web: SpiderWeb, mode: Mode) {
        web.reset_player();
        self.web = web;
        self.mode = mode;
        self.gate.reset();
        self.collected.clear();
        self.score = 0;
        self.phase = SessionPhase::Playing;
        info!(target: "session", "Session restarted ({:?})", mode);
    }

    /// Immutable view of the session for renderers
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            mode: self.mode,
            phase: self.phase,
            rows: self.web.rows(),
            cols: self.web.cols(),
            words: self.web.word_matrix().to_vec(),
            player: self.web.player(),
            mid: self.web.mid(),
            score: self.score,
            collected: self.collected.clone(),
            category: self.web.category().to_string(),
        }
    }
}

/// Renderable view of a session, published on the runner's watch channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub mode: Mode,
    pub phase: SessionPhase,
    pub rows: usize,
    pub cols: usize,
    /// Word matrix contents, row-major
    pub words: Vec<Option<String>>,
    pub player: Cell,
    pub mid: Cell,
    pub score: u32,
    pub collected: Vec<String>,
    pub category: String,
}
