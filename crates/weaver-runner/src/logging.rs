use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weaver_core::config::ProjectPaths;

const MAX_LOG_SIZE: u64 = 1024 * 1024; // 1MB

/// Initialize logging for a component.
///
/// - `component_name`: Name of the component (e.g., "tui")
/// - `enabled`: If true, enables file logging. If false, only console logging.
///
/// Returns a guard that must be kept alive for the duration of the program.
pub fn init_logging(component_name: &str, enabled: bool) -> io::Result<Option<WorkerGuard>> {
    if enabled {
        let log_dir = get_log_directory()?;
        fs::create_dir_all(&log_dir)?;

        let log_filename = format!("{}.log", component_name);
        let log_path = log_dir.join(&log_filename);

        // Truncate if over 1MB
        truncate_if_needed(&log_path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let (non_blocking_file, guard) = tracing_appender::non_blocking(BufWriter::new(file));

        // Layered subscriber with both console and file output
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stdout).with_ansi(true))
            .with(
                fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false)
                    .with_target(true),
            )
            .init();

        tracing::info!("Logging to file: {}", log_path.display());

        Ok(Some(guard))
    } else {
        // Console-only logging
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        Ok(None)
    }
}

/// Get the log directory path.
fn get_log_directory() -> io::Result<PathBuf> {
    let proj_paths = ProjectPaths::new("weaver")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Failed to find home directory"))?;

    Ok(proj_paths.data_dir().join("logs"))
}

/// Truncate log file if it exceeds MAX_LOG_SIZE.
fn truncate_if_needed(log_path: &PathBuf) -> io::Result<()> {
    if log_path.exists() {
        let metadata = fs::metadata(log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            let file = File::create(log_path)?;
            file.set_len(0)?;
        }
    }
    Ok(())
}
