use weaver_events::{Cell, Direction};

use crate::error::GridError;

/// Reserved sentinel word occupying the final path cell. Never equal to a
/// collectible word; the vocabulary rejects it at construction.
pub const END_WORD: &str = "END";

/// The word/score grid for one session
///
/// Owns the word matrix, the score matrix and the ordered collection path.
/// Extents and path are immutable after construction; only cell words (via
/// `clear_word`) and the player position change during play.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiderWeb {
    rows: usize,
    cols: usize,
    words: Vec<Option<String>>, // row-major, rows * cols
    scores: Vec<u32>,           // row-major, rows * cols
    path: Vec<Cell>,            // collection order, last entry is the END cell
    player: Cell,
    mid: Cell,
    category: String,
}

impl SpiderWeb {
    pub(crate) fn new(
        rows: usize,
        cols: usize,
        words: Vec<Option<String>>,
        scores: Vec<u32>,
        path: Vec<Cell>,
        category: String,
    ) -> Self {
        debug_assert_eq!(words.len(), rows * cols);
        debug_assert_eq!(scores.len(), rows * cols);
        debug_assert!(!path.is_empty());

        let mid = Cell::new(rows / 2, cols / 2);
        Self {
            rows,
            cols,
            words,
            scores,
            path,
            player: mid,
            mid,
            category,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn player(&self) -> Cell {
        self.player
    }

    /// Starting cell, the grid center
    pub fn mid(&self) -> Cell {
        self.mid
    }

    /// Collection path in order; the last entry is the END cell
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    pub fn end_cell(&self) -> Cell {
        // Invariant: path is never empty
        self.path[self.path.len() - 1]
    }

    /// Word matrix contents, row-major (renderer query)
    pub fn word_matrix(&self) -> &[Option<String>] {
        &self.words
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if self.in_bounds(row, col) {
            Ok(row * self.cols + col)
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Word occupying the cell, None if the cell is empty
    pub fn word_at(&self, row: usize, col: usize) -> Result<Option<&str>, GridError> {
        let idx = self.checked_index(row, col)?;
        Ok(self.words[idx].as_deref())
    }

    /// Points awarded when the cell's word is collected
    pub fn score_at(&self, row: usize, col: usize) -> Result<u32, GridError> {
        let idx = self.checked_index(row, col)?;
        Ok(self.scores[idx])
    }

    /// Remove the cell's word so it cannot be collected twice. Idempotent.
    pub fn clear_word(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let idx = self.checked_index(row, col)?;
        self.words[idx] = None;
        Ok(())
    }

    /// Membership test against the collection path
    pub fn is_on_path(&self, row: usize, col: usize) -> bool {
        self.path.iter().any(|c| c.row == row && c.col == col)
    }

    /// Neighbor of `cell` one step in `direction`, or None if the step
    /// leaves the web
    pub fn target_from(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        cell.step(direction)
            .filter(|c| self.in_bounds(c.row, c.col))
    }

    /// Count of collectible words still on the web (END excluded)
    pub fn remaining_words(&self) -> usize {
        self.path[..self.path.len() - 1]
            .iter()
            .filter(|c| self.words[c.row * self.cols + c.col].is_some())
            .count()
    }

    pub(crate) fn set_player(&mut self, cell: Cell) {
        debug_assert!(self.in_bounds(cell.row, cell.col));
        self.player = cell;
    }

    /// Put the player back on the starting cell
    pub(crate) fn reset_player(&mut self) {
        self.player = self.mid;
    }
}
