//! Terminal rendering.
//!
//! - [`charts`]: the chart grid and the focused single chart
//! - [`common`]: header, status bar, help overlay
//! - [`theme`]: light/dark colors

pub mod charts;
pub mod common;
pub mod theme;

pub use theme::Theme;
