pub mod game_config;
pub mod paths;
pub mod server_config;
pub mod weaver_config;

pub use game_config::GameConfig;
pub use paths::ProjectPaths;
pub use server_config::ServerConfig;
pub use weaver_config::{ConfigLoadError, WeaverConfig};
