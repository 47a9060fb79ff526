use rand::Rng;
use tracing::warn;

use crate::grid::web::END_WORD;

/// A named category and its collectible words
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub words: Vec<String>,
}

impl Category {
    /// Build a category, dropping words that can never be collectible
    /// (empty strings and the END sentinel). Returns None if nothing valid
    /// remains.
    pub fn new(name: impl Into<String>, words: impl IntoIterator<Item = String>) -> Option<Self> {
        let name = name.into();
        let words: Vec<String> = words
            .into_iter()
            .filter(|w| {
                if w.is_empty() || w == END_WORD {
                    warn!(target: "vocabulary", "Dropping reserved word {:?} from category {}", w, name);
                    false
                } else {
                    true
                }
            })
            .collect();
        if words.is_empty() {
            return None;
        }
        Some(Self { name, words })
    }
}

/// Source of categories and word lists for offline generation
///
/// A built-in set ships with the crate; hosts with their own vocabulary
/// construct one through `Vocabulary::new`.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    categories: Vec<Category>,
}

impl Vocabulary {
    pub fn new(categories: Vec<Category>) -> Option<Self> {
        if categories.is_empty() {
            return None;
        }
        Some(Self { categories })
    }

    /// The built-in category set
    pub fn builtin() -> Self {
        let raw: &[(&str, &[&str])] = &[
            ("Animals", &["CAT", "DOG", "FOX", "OWL", "BEAR", "WOLF", "HORSE"]),
            ("Fruits", &["APPLE", "MANGO", "GRAPE", "LEMON", "PEACH", "PLUM"]),
            ("Colors", &["RED", "BLUE", "GREEN", "WHITE", "BLACK", "PURPLE"]),
            ("Sports", &["GOLF", "TENNIS", "SOCCER", "RUGBY", "HOCKEY", "BOXING"]),
            ("Weather", &["RAIN", "SNOW", "STORM", "CLOUD", "WIND", "FROST"]),
        ];
        let categories = raw
            .iter()
            .filter_map(|(name, words)| {
                Category::new(*name, words.iter().map(|w| w.to_string()))
            })
            .collect();
        // The built-in lists contain no reserved words
        Self::new(categories).expect("built-in vocabulary is non-empty")
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Pick a category uniformly at random
    pub fn choose<'a>(&'a self, rng: &mut impl Rng) -> &'a Category {
        // Invariant: categories is never empty
        &self.categories[rng.gen_range(0..self.categories.len())]
    }
}
