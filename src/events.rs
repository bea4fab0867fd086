use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, View, EXPORT_FILE};
use crate::data::Series;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Focus a single chart
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(n) = c.to_digit(10) {
                app.focus_index(n as usize);
            }
        }

        // Back to the grid
        KeyCode::Char('0') | KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Cycle focus
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => cycle_focus(app, 1),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => cycle_focus(app, -1),

        // Fetch now
        KeyCode::Char('r') => app.refresh_now(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = Path::new(EXPORT_FILE);
            match app.export_state(export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Move the focused chart forwards or backwards; from the grid, start at the
/// first or last chart.
fn cycle_focus(app: &mut App, step: isize) {
    let count = Series::ALL.len() as isize;
    let next = match app.current_view {
        View::Grid if step > 0 => 0,
        View::Grid => count - 1,
        View::Focus(series) => {
            let current = Series::ALL
                .iter()
                .position(|s| *s == series)
                .unwrap_or(0) as isize;
            (current + step).rem_euclid(count)
        }
    };
    app.focus_index(next as usize + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DashboardState;
    use std::sync::Arc;
    use tokio::sync::watch;

    fn app() -> (watch::Sender<Arc<DashboardState>>, App) {
        let (tx, rx) = watch::channel(Arc::new(DashboardState::new(60)));
        (tx, App::with_parts(rx, Box::new(|| {}), "test".to_string()))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_q_quits() {
        let (_tx, mut app) = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_number_keys_focus_and_zero_returns() {
        let (_tx, mut app) = app();
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.current_view, View::Focus(Series::Load));
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.current_view, View::Focus(Series::Cpu));
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.current_view, View::Grid);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_view, View::Grid);
    }

    #[test]
    fn test_tab_cycles_through_charts() {
        let (_tx, mut app) = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Focus(Series::Cpu));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_view, View::Focus(Series::Load));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Focus(Series::Cpu));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (_tx, mut app) = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }
}
