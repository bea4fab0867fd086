//! Application state and navigation logic.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::data::{DashboardState, Series};
use crate::poll::PollerHandle;
use crate::ui::Theme;

/// Default file written by the `e` key.
pub const EXPORT_FILE: &str = "agentdash_export.json";

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// What the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// All five charts.
    Grid,
    /// A single chart using the whole content area.
    Focus(Series),
}

impl View {
    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Grid => "Overview",
            View::Focus(series) => series.label(),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Published dashboard state
    updates: watch::Receiver<Arc<DashboardState>>,
    refresh: Box<dyn Fn() + Send>,
    source: String,
    pub state: Arc<DashboardState>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create an App that follows a running poller.
    pub fn new(poller: &PollerHandle) -> Self {
        let trigger = poller.refresh_trigger();
        let mut app = Self::with_parts(
            poller.subscribe(),
            Box::new(move || trigger.notify_one()),
            poller.description().to_string(),
        );
        app.theme = Theme::auto_detect();
        app
    }

    /// Create an App from its collaborators, using the dark theme.
    pub fn with_parts(
        updates: watch::Receiver<Arc<DashboardState>>,
        refresh: Box<dyn Fn() + Send>,
        source: String,
    ) -> Self {
        let state = updates.borrow().clone();
        Self {
            running: true,
            current_view: View::Grid,
            show_help: false,
            updates,
            refresh,
            source,
            state,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    /// Returns a description of the polled endpoint.
    pub fn source_description(&self) -> &str {
        &self.source
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Pick up the latest published state.
    ///
    /// Returns true if a new state was received.
    pub fn reload_data(&mut self) -> bool {
        match self.updates.has_changed() {
            Ok(true) => {
                self.state = self.updates.borrow_and_update().clone();
                true
            }
            // The poller is gone; keep showing the last state
            Ok(false) | Err(_) => false,
        }
    }

    /// Ask the poller for an immediate fetch.
    pub fn refresh_now(&mut self) {
        (self.refresh)();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Show one chart full screen.
    pub fn focus(&mut self, series: Series) {
        self.current_view = View::Focus(series);
    }

    /// Focus the n-th chart (1-based, display order).
    pub fn focus_index(&mut self, n: usize) {
        if let Some(series) = n.checked_sub(1).and_then(|i| Series::ALL.get(i)) {
            self.focus(*series);
        }
    }

    /// Return to the chart grid.
    pub fn go_back(&mut self) {
        self.current_view = View::Grid;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Time since the last successful poll.
    pub fn last_update_age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.state.last_success.map(|at| now - at)
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        write_export(path, &self.source, &self.state)
    }
}

/// Document written by [`write_export`].
#[derive(Debug, Serialize)]
pub struct Export<'a> {
    pub source: &'a str,
    pub exported_at: DateTime<Utc>,
    pub state: &'a DashboardState,
}

/// Write `state` as pretty-printed JSON.
pub fn write_export(path: &Path, source: &str, state: &DashboardState) -> Result<()> {
    let export = Export {
        source,
        exported_at: Utc::now(),
        state,
    };
    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(path, json)?;
    Ok(())
}
