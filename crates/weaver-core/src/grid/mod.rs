// Re-export main types
pub use self::generator::{generate_offline, web_from_layout};
pub use self::layout::LayoutPayload;
pub use self::vocabulary::{Category, Vocabulary};
pub use self::web::{SpiderWeb, END_WORD};

mod generator;
mod layout;
mod vocabulary;
mod web;
