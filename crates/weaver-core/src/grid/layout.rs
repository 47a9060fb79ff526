use serde::{Deserialize, Serialize};

/// Layout document supplied by the layout server for online play
///
/// Matrices are row-major nested lists; an empty string marks a cell with no
/// word. The payload is taken verbatim after validation (`web_from_layout`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPayload {
    pub rows: usize,
    pub cols: usize,
    pub words: Vec<Vec<String>>,
    pub scores: Vec<Vec<u32>>,
    pub category: String,
}
