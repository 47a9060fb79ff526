use std::path::PathBuf;

use directories::ProjectDirs;

/// Platform config/data locations
///
/// XDG Base Directory layout on Unix-like systems, the usual AppData
/// conventions on Windows.
pub struct ProjectPaths {
    dirs: ProjectDirs,
}

impl ProjectPaths {
    /// Create a ProjectPaths instance for the given application name.
    /// Returns None when no home directory can be determined.
    pub fn new(name: &str) -> Option<Self> {
        ProjectDirs::from("", "", name).map(|dirs| ProjectPaths { dirs })
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> PathBuf {
        self.dirs.config_dir().to_path_buf()
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        self.dirs.data_dir().to_path_buf()
    }
}
