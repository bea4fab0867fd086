//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use super::common::FeedStatus;
use crate::data::Series;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for a feed that has not produced data yet.
    pub warning: Color,
    /// Color for a failing feed and error text.
    pub critical: Color,
    /// Color for a live feed.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for titles.
    pub header: Style,
    /// Style for axis labels and secondary text.
    pub muted: Style,
    /// Line colors: cpu, memory, network, disk.
    pub lines: [Color; 4],
    /// Line colors for the 1, 5 and 15 minute load averages.
    pub load_lines: [Color; 3],
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::Gray),
            lines: [Color::Cyan, Color::Magenta, Color::Green, Color::Yellow],
            load_lines: [Color::LightRed, Color::LightYellow, Color::LightBlue],
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            lines: [Color::Blue, Color::Magenta, Color::Green, Color::Rgb(170, 120, 0)],
            load_lines: [Color::Red, Color::Rgb(170, 120, 0), Color::Blue],
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for the feed status indicator
    pub fn status_style(&self, status: FeedStatus) -> Style {
        match status {
            FeedStatus::Live => Style::default().fg(self.healthy),
            FeedStatus::Loading => Style::default().fg(self.warning),
            FeedStatus::Failing => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    /// Line color for a scalar series; load uses [`Theme::load_lines`].
    pub fn series_color(&self, series: Series) -> Color {
        match series {
            Series::Cpu => self.lines[0],
            Series::Memory => self.lines[1],
            Series::Network => self.lines[2],
            Series::Disk => self.lines[3],
            Series::Load => self.load_lines[0],
        }
    }
}
