//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, and help overlay.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_age;
use crate::data::DashboardState;

/// Overall state of the telemetry feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// No successful poll yet.
    Loading,
    /// The latest poll succeeded.
    Live,
    /// The latest poll failed.
    Failing,
}

impl FeedStatus {
    pub fn of(state: &DashboardState) -> Self {
        if state.error.is_some() {
            FeedStatus::Failing
        } else if state.loading {
            FeedStatus::Loading
        } else {
            FeedStatus::Live
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedStatus::Loading => "loading",
            FeedStatus::Live => "live",
            FeedStatus::Failing => "failing",
        }
    }
}

/// Render the header bar.
///
/// Displays: status indicator, host identity, view, revision.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let status = FeedStatus::of(state);

    let host = match &state.host {
        Some(host) => {
            let name = host.hostname.as_deref().unwrap_or("unknown host");
            match &host.ip_address {
                Some(ip) => format!("{} ({})", name, ip),
                None => name.to_string(),
            }
        }
        None => app.source_description().to_string(),
    };

    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(status)),
        Span::styled("AGENTDASH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(host),
        Span::raw(" │ "),
        Span::styled(status.label(), app.theme.status_style(status)),
    ];

    if state.consecutive_failures > 1 {
        spans.push(Span::styled(
            format!(" x{}", state.consecutive_failures),
            Style::default().fg(app.theme.critical),
        ));
    }

    spans.push(Span::raw(format!(
        " │ {} │ rev {}",
        app.current_view.label(),
        state.revision
    )));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Format a byte count for display (e.g., 1536 -> "1.5 KiB").
pub fn format_bytes(n: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

    if n < 1024 {
        return format!("{} B", n);
    }

    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update, the latest error, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Grid => "1-5:focus r:refresh e:export ?:help q:quit",
        View::Focus(_) => "Tab:next 0/Esc:back r:refresh ?:help q:quit",
    };

    let updated = match app.last_update_age(Utc::now()) {
        Some(age) => format!("Updated {}", format_age(age)),
        None => "Waiting for first update".to_string(),
    };

    let line = match &app.state.error {
        Some(err) => Line::from(vec![
            Span::raw(format!(" {} | ", updated)),
            Span::styled(format!("Error: {}", err), Style::default().fg(app.theme.critical)),
            Span::raw(format!(" | {}", controls)),
        ]),
        None if app.state.loading => Line::from(format!(" Loading... | {}", controls)),
        None => Line::from(format!(" {} | {}", updated, controls)),
    };

    let paragraph = Paragraph::new(line).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Charts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  1-5         Focus one chart"),
        Line::from("  Tab/→ ←     Next/previous chart"),
        Line::from("  0/Esc       Back to all charts"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Fetch now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 17u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
