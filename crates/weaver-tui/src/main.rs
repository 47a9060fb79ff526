use std::io::Stdout;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use weaver_core::config::{ServerConfig, WeaverConfig};
use weaver_core::Mode;
use weaver_runner::{
    init_logging, spawn_consumer, spawn_session, CueConsumer, LoggingCueSink, RunnerConfig,
};

mod app;
mod keyboard;
mod ui;

use app::App;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fetch the web from the configured layout server
    #[arg(long)]
    online: bool,

    /// Layout server address (host:port), overrides the config file
    #[arg(short, long)]
    server: Option<String>,

    /// Also log to a file in the data directory
    #[arg(long)]
    log_file: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging("tui", cli.log_file)?;

    let config = WeaverConfig::load_or_default();
    let server = match &cli.server {
        Some(address) => Some(parse_server(address)?),
        None => config.server.clone(),
    };

    let mode = if cli.online {
        Mode::Online
    } else {
        Mode::Offline
    };

    let runner_config = RunnerConfig {
        session_id: 0,
        mode,
        server,
        game: config.game.clone(),
    };
    let handle = spawn_session(runner_config);

    // Audio/speech collaborator: log-only sink in the terminal build
    spawn_consumer(
        handle.subscribe(),
        Box::new(CueConsumer::new(Box::new(LoggingCueSink))),
    );

    let mut terminal = init_terminal()?;
    let result = run_app(&mut terminal, &handle).await;
    restore_terminal(&mut terminal)?;

    handle.shutdown();
    handle.join().await;
    info!("TUI shut down cleanly");

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    handle: &weaver_runner::SessionHandle,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let mut events = handle.subscribe();
    let mut snapshots = handle.snapshots();
    let mut input_rx = spawn_input_thread();
    let mut tick = tokio::time::interval(Duration::from_millis(50));

    loop {
        app.snapshot = snapshots.borrow_and_update().clone();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        tokio::select! {
            Some(event) = input_rx.recv() => {
                if let CrosstermEvent::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key, handle);
                    }
                }
            }
            envelope = events.recv() => {
                match envelope {
                    Ok(envelope) => app.update_from_envelope(&envelope),
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = snapshots.changed() => {}
            _ = tick.tick() => {}
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Blocking crossterm reads happen off the async runtime
fn spawn_input_thread() -> mpsc::UnboundedReceiver<CrosstermEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match crossterm::event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
    rx
}

fn parse_server(address: &str) -> anyhow::Result<ServerConfig> {
    let (host, port) = address
        .rsplit_once(':')
        .context("server address must be host:port")?;
    let port: u16 = port.parse().context("invalid server port")?;
    Ok(ServerConfig::new(host, port))
}

fn init_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
