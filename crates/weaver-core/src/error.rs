use thiserror::Error;

/// Grid query outside the web's extents
///
/// Surfaced to the caller as a result, never a crash; the movement gate
/// treats the equivalent condition as an expected game event instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} web")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// A server-supplied layout failed validation
///
/// Always recovered by falling back to offline initialization with a
/// degraded-mode notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{matrix} matrix does not match the declared {rows}x{cols} extents")]
    DimensionMismatch {
        matrix: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("layout has no END cell")]
    MissingEnd,
    #[error("layout has {0} END cells, expected exactly one")]
    DuplicateEnd(usize),
    #[error("word cells do not form a single connected path ending at END")]
    BrokenPath,
}
