use serde::{Deserialize, Serialize};

/// Tunables for offline web generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Allowed square web dimensions; one is picked at random per session
    pub dimensions: Vec<usize>,

    /// Upper bound on collectible words per web
    pub max_words: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dimensions: vec![5, 6],
            max_words: 6,
        }
    }
}
