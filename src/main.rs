use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agentdash::app::write_export;
use agentdash::{
    apply, events, fetcher_for_endpoint, ui, App, DashboardState, Overrides, Poller,
    PollerHandle, RetryStrategy, Settings, SnapshotFetcher,
};

/// How long to wait for blocking reads when the runtime shuts down.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "agentdash", version)]
#[command(about = "Terminal dashboard for a network agent's telemetry endpoint")]
struct Args {
    /// Snapshot URL, file:// URL, or path to the agent's latest.json
    /// [default: http://localhost:8000/latest.json]
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Poll interval (e.g., "60s", "10s", "5m") [default: 60s]
    #[arg(short, long)]
    interval: Option<String>,

    /// Points kept per chart [default: 60]
    #[arg(long)]
    capacity: Option<usize>,

    /// Request timeout (e.g., "10s", "500ms") [default: 10s]
    #[arg(long)]
    timeout: Option<String>,

    /// How the interval reacts to failed polls [default: fixed]
    #[arg(long, value_enum)]
    retry: Option<RetryStrategy>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch once, write the resulting state as JSON, and exit
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            poll_interval: self.interval.clone(),
            capacity: self.capacity,
            request_timeout: self.timeout.clone(),
            retry: self.retry,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
    let fetcher = fetcher_for_endpoint(&settings.endpoint, settings.request_timeout)
        .with_context(|| format!("cannot poll {}", settings.endpoint))?;

    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        let result = rt.block_on(export_once(fetcher, &settings, export_path));
        rt.shutdown_timeout(SHUTDOWN_GRACE);
        return result;
    }

    // The poller runs on the runtime's workers; the TUI owns the main thread
    let poller = {
        let _guard = rt.enter();
        Poller::new(fetcher, settings.poll_interval)
            .capacity(settings.capacity)
            .retry(settings.retry)
            .spawn()
    };

    let result = run_tui(&poller);

    rt.block_on(poller.shutdown());
    // A timed-out file read can leave a thread parked in the blocking pool
    rt.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Send `tracing` output to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agentdash=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Fetch a single snapshot and write the aggregated state.
///
/// The state is written even when the fetch fails (it then carries the error
/// message); the failure is still reported through the exit status.
async fn export_once(
    fetcher: Arc<dyn SnapshotFetcher>,
    settings: &Settings,
    export_path: &Path,
) -> Result<()> {
    let outcome = fetcher.fetch().await;
    let state = apply(&DashboardState::new(settings.capacity), &outcome, Utc::now());

    write_export(export_path, fetcher.description(), &state)
        .with_context(|| format!("cannot write {}", export_path.display()))?;
    info!(path = %export_path.display(), "exported state");

    match outcome {
        Ok(_) => {
            println!("Exported to {}", export_path.display());
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "export fetch failed");
            Err(anyhow::Error::new(e).context(format!("fetch from {} failed", fetcher.description())))
        }
    }
}

/// Run the TUI until the user quits
fn run_tui(poller: &PollerHandle) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(poller);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 14;

    while app.running {
        app.reload_data();

        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(10),   // Charts
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::charts::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(250))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
