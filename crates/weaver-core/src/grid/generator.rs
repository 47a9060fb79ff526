use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use weaver_events::{Cell, Direction};

use crate::config::GameConfig;
use crate::error::LayoutError;
use crate::grid::layout::LayoutPayload;
use crate::grid::vocabulary::Vocabulary;
use crate::grid::web::{SpiderWeb, END_WORD};

/// Points per letter for generated webs
const SCORE_PER_LETTER: u32 = 5;

/// Fallback when the configured dimension set is empty
const DEFAULT_DIMENSIONS: [usize; 2] = [5, 6];

const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

pub(crate) fn score_for(word: &str) -> u32 {
    word.chars().count() as u32 * SCORE_PER_LETTER
}

/// Generate a random web for offline play
///
/// Picks a square dimension from the configured set, a category from the
/// vocabulary, and lays the category's words along a self-avoiding random
/// walk starting at the grid center. The walk's final cell gets the END
/// sentinel; a dead end truncates the walk (never below two cells, since the
/// center always has free neighbors on the first step).
pub fn generate_offline(
    vocabulary: &Vocabulary,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> SpiderWeb {
    let dims = if config.dimensions.is_empty() {
        &DEFAULT_DIMENSIONS[..]
    } else {
        &config.dimensions[..]
    };
    let dimension = dims.choose(rng).copied().unwrap_or(DEFAULT_DIMENSIONS[0]);

    let category = vocabulary.choose(rng);
    let mut words: Vec<String> = category.words.clone();
    words.shuffle(rng);
    words.truncate(config.max_words.min(dimension * dimension - 1));

    let path = random_walk(dimension, words.len() + 1, rng);
    words.truncate(path.len() - 1);

    debug!(
        target: "generator",
        "Generated {}x{} web: category={}, path_len={}",
        dimension, dimension, category.name, path.len()
    );

    let mut word_matrix: Vec<Option<String>> = vec![None; dimension * dimension];
    let mut score_matrix: Vec<u32> = vec![0; dimension * dimension];
    for (cell, word) in path.iter().zip(words.iter()) {
        let idx = cell.row * dimension + cell.col;
        score_matrix[idx] = score_for(word);
        word_matrix[idx] = Some(word.clone());
    }
    let end = path[path.len() - 1];
    word_matrix[end.row * dimension + end.col] = Some(END_WORD.to_string());

    SpiderWeb::new(
        dimension,
        dimension,
        word_matrix,
        score_matrix,
        path,
        category.name.clone(),
    )
}

/// Self-avoiding random walk over a `dimension` x `dimension` grid,
/// starting at the center, at most `target_len` cells long
fn random_walk(dimension: usize, target_len: usize, rng: &mut impl Rng) -> Vec<Cell> {
    let mid = Cell::new(dimension / 2, dimension / 2);
    let mut path = vec![mid];
    let mut visited: HashSet<Cell> = HashSet::from([mid]);

    while path.len() < target_len {
        let current = path[path.len() - 1];
        let neighbors: Vec<Cell> = ALL_DIRECTIONS
            .iter()
            .filter_map(|d| current.step(*d))
            .filter(|c| c.row < dimension && c.col < dimension && !visited.contains(c))
            .collect();
        match neighbors.choose(rng) {
            Some(&next) => {
                visited.insert(next);
                path.push(next);
            }
            // Dead end: accept the shorter path
            None => break,
        }
    }
    path
}

/// Validate a server-supplied layout and build a web from it
///
/// The matrices are taken verbatim; validation only checks that the extents
/// match, that exactly one END cell exists, and that the word-bearing cells
/// form a single simple 4-connected path ending at END. The path order is
/// reconstructed by walking from the far endpoint toward END.
pub fn web_from_layout(payload: &LayoutPayload) -> Result<SpiderWeb, LayoutError> {
    let LayoutPayload { rows, cols, .. } = *payload;

    if payload.words.len() != rows || payload.words.iter().any(|r| r.len() != cols) {
        return Err(LayoutError::DimensionMismatch {
            matrix: "word",
            rows,
            cols,
        });
    }
    if payload.scores.len() != rows || payload.scores.iter().any(|r| r.len() != cols) {
        return Err(LayoutError::DimensionMismatch {
            matrix: "score",
            rows,
            cols,
        });
    }

    let mut word_matrix: Vec<Option<String>> = Vec::with_capacity(rows * cols);
    for row in &payload.words {
        for word in row {
            word_matrix.push(if word.is_empty() {
                None
            } else {
                Some(word.clone())
            });
        }
    }
    let score_matrix: Vec<u32> = payload.scores.iter().flatten().copied().collect();

    let word_cells: Vec<Cell> = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| Cell::new(r, c)))
        .filter(|cell| word_matrix[cell.row * cols + cell.col].is_some())
        .collect();

    let ends: Vec<Cell> = word_cells
        .iter()
        .copied()
        .filter(|cell| word_matrix[cell.row * cols + cell.col].as_deref() == Some(END_WORD))
        .collect();
    let end = match ends.len() {
        0 => return Err(LayoutError::MissingEnd),
        1 => ends[0],
        n => return Err(LayoutError::DuplicateEnd(n)),
    };

    let path = reconstruct_path(&word_cells, end)?;

    Ok(SpiderWeb::new(
        rows,
        cols,
        word_matrix,
        score_matrix,
        path,
        payload.category.clone(),
    ))
}

/// Order the word cells as a simple path ending at `end`
///
/// A valid path has every cell with one or two neighbors in the set, exactly
/// two endpoints (one of which is END), and a walk from the far endpoint
/// that covers every cell. Anything else - branching, cycles, disconnected
/// islands - is rejected.
fn reconstruct_path(cells: &[Cell], end: Cell) -> Result<Vec<Cell>, LayoutError> {
    if cells.len() == 1 {
        // A lone END cell is a degenerate but valid path
        return Ok(vec![end]);
    }

    let set: HashSet<Cell> = cells.iter().copied().collect();
    let neighbors_of = |cell: Cell| -> Vec<Cell> {
        ALL_DIRECTIONS
            .iter()
            .filter_map(|d| cell.step(*d))
            .filter(|c| set.contains(c))
            .collect()
    };

    let mut endpoints = Vec::new();
    for &cell in cells {
        match neighbors_of(cell).len() {
            1 => endpoints.push(cell),
            2 => {}
            _ => return Err(LayoutError::BrokenPath),
        }
    }
    if endpoints.len() != 2 || !endpoints.contains(&end) {
        return Err(LayoutError::BrokenPath);
    }
    let start = if endpoints[0] == end {
        endpoints[1]
    } else {
        endpoints[0]
    };

    let mut path = vec![start];
    let mut visited: HashSet<Cell> = HashSet::from([start]);
    let mut current = start;
    loop {
        let next = neighbors_of(current)
            .into_iter()
            .find(|c| !visited.contains(c));
        match next {
            Some(cell) => {
                visited.insert(cell);
                path.push(cell);
                current = cell;
            }
            None => break,
        }
    }

    // The walk must consume every word cell and land on END
    if path.len() != cells.len() || path[path.len() - 1] != end {
        return Err(LayoutError::BrokenPath);
    }
    Ok(path)
}
