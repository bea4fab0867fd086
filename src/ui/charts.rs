//! Line charts for the five series.
//!
//! The x axis is time in seconds relative to the newest point on screen, so
//! every chart shares the same right edge ("now").

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::common::format_bytes;
use crate::app::{App, View};
use crate::data::{Scalar, Series, SeriesBuffer};

/// Render the main content area for the current view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_view {
        View::Grid => render_grid(frame, app, area),
        View::Focus(series) => render_series(frame, app, series, area),
    }
}

/// Three charts on top, two below.
fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let top_cells = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(top);
    let bottom_cells = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(bottom);

    for (series, cell) in Series::ALL
        .iter()
        .zip(top_cells.iter().chain(bottom_cells.iter()))
    {
        render_series(frame, app, *series, *cell);
    }
}

fn render_series(frame: &mut Frame, app: &App, series: Series, area: Rect) {
    let state = &app.state;
    let reference = state.latest_point_at().unwrap_or_else(Utc::now);

    match series {
        Series::Cpu => render_scalar(
            frame,
            app,
            series,
            &state.cpu,
            reference,
            Some(100.0),
            |v| format!("{:.1}%", v),
            area,
        ),
        Series::Memory => render_scalar(
            frame,
            app,
            series,
            &state.memory,
            reference,
            state.memory_total.map(|t| t as f64),
            |v| format_bytes(v as u64),
            area,
        ),
        Series::Network => render_scalar(
            frame,
            app,
            series,
            &state.network,
            reference,
            None,
            |v| format_bytes(v as u64),
            area,
        ),
        Series::Disk => render_scalar(
            frame,
            app,
            series,
            &state.disk,
            reference,
            state.disk_total.map(|t| t as f64),
            |v| format_bytes(v as u64),
            area,
        ),
        Series::Load => render_load(frame, app, reference, area),
    }
}

#[allow(clippy::too_many_arguments)]
fn render_scalar<T: Scalar>(
    frame: &mut Frame,
    app: &App,
    series: Series,
    buffer: &SeriesBuffer<T>,
    reference: DateTime<Utc>,
    ceiling: Option<f64>,
    format: impl Fn(f64) -> String,
    area: Rect,
) {
    let Some(latest) = buffer.latest() else {
        render_empty(frame, app, series, area);
        return;
    };

    let data = to_xy(buffer, reference, |v| v.as_f64());
    let [y_min, y_max] = y_bounds(buffer.value_range(), ceiling);

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.series_color(series)))
        .data(&data);

    let title = format!(" {}  {} ", series.label(), format(latest.value.as_f64()));
    let chart = Chart::new(vec![dataset])
        .block(chart_block(app, title))
        .x_axis(x_axis(app, &data))
        .y_axis(
            Axis::default()
                .style(app.theme.muted)
                .bounds([y_min, y_max])
                .labels(vec![Line::from(format(y_min)), Line::from(format(y_max))]),
        );

    frame.render_widget(chart, area);
}

fn render_load(frame: &mut Frame, app: &App, reference: DateTime<Utc>, area: Rect) {
    let buffer = &app.state.load;
    let Some(latest) = buffer.latest() else {
        render_empty(frame, app, Series::Load, area);
        return;
    };

    let one = to_xy(buffer, reference, |l| l.one);
    let five = to_xy(buffer, reference, |l| l.five);
    let fifteen = to_xy(buffer, reference, |l| l.fifteen);

    let hi = buffer
        .iter()
        .map(|p| p.value.one.max(p.value.five).max(p.value.fifteen))
        .fold(0.0, f64::max);
    let [y_min, y_max] = y_bounds(Some((0.0, hi)), None);

    let datasets = [("1m", &one), ("5m", &five), ("15m", &fifteen)]
        .into_iter()
        .zip(app.theme.load_lines)
        .map(|((name, data), color)| {
            Dataset::default()
                .name(name)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let title = format!(
        " {}  {:.2} {:.2} {:.2} ",
        Series::Load.label(),
        latest.value.one,
        latest.value.five,
        latest.value.fifteen
    );
    let chart = Chart::new(datasets)
        .block(chart_block(app, title))
        .x_axis(x_axis(app, &one))
        .y_axis(
            Axis::default()
                .style(app.theme.muted)
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{:.2}", y_min)),
                    Line::from(format!("{:.2}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_empty(frame: &mut Frame, app: &App, series: Series, area: Rect) {
    let message = if app.state.loading {
        "Loading..."
    } else {
        "No data reported"
    };
    let paragraph = Paragraph::new(message)
        .style(app.theme.muted)
        .alignment(Alignment::Center)
        .block(chart_block(app, format!(" {} ", series.label())));
    frame.render_widget(paragraph, area);
}

fn chart_block(app: &App, title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(app.theme.header)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn x_axis<'a>(app: &App, data: &[(f64, f64)]) -> Axis<'a> {
    let x_min = data.first().map_or(-1.0, |(x, _)| *x).min(-1.0);
    Axis::default()
        .style(app.theme.muted)
        .bounds([x_min, 0.0])
        .labels(vec![
            Line::from(format!("{:.0}s", x_min)),
            Line::from("now"),
        ])
}

/// Points as (seconds relative to `reference`, value), oldest first.
fn to_xy<T: Copy>(
    buffer: &SeriesBuffer<T>,
    reference: DateTime<Utc>,
    value: impl Fn(T) -> f64,
) -> Vec<(f64, f64)> {
    buffer
        .iter()
        .map(|p| {
            let x = (p.at - reference).num_milliseconds() as f64 / 1000.0;
            (x, value(p.value))
        })
        .collect()
}

/// Y axis bounds for a window whose values span `range`.
///
/// With a known ceiling (100% or a reported total) the axis spans zero to the
/// ceiling. Otherwise it hugs the data with 10% headroom and never goes below
/// zero.
fn y_bounds(range: Option<(f64, f64)>, ceiling: Option<f64>) -> [f64; 2] {
    let (lo, hi) = range.unwrap_or((0.0, 0.0));

    if let Some(ceiling) = ceiling.filter(|c| *c > 0.0 && *c >= hi) {
        return [0.0, ceiling];
    }

    let pad = ((hi - lo) * 0.1).max(hi.abs() * 0.01);
    let lower = (lo - pad).max(0.0);
    let upper = hi + pad;
    if upper > lower {
        [lower, upper]
    } else {
        [lower, lower + 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_to_xy_is_relative_to_reference() {
        let mut buffer = SeriesBuffer::new(10);
        buffer.push(t(0), 1.0);
        buffer.push(t(60), 2.0);
        buffer.push(t(120), 3.0);

        let xy = to_xy(&buffer, t(120), |v| v);
        assert_eq!(xy, vec![(-120.0, 1.0), (-60.0, 2.0), (0.0, 3.0)]);
    }

    #[test]
    fn test_y_bounds_with_ceiling() {
        assert_eq!(y_bounds(Some((10.0, 40.0)), Some(100.0)), [0.0, 100.0]);
    }

    #[test]
    fn test_y_bounds_ignores_ceiling_below_data() {
        let [lo, hi] = y_bounds(Some((10.0, 200.0)), Some(100.0));
        assert!(lo >= 0.0);
        assert!(hi > 200.0);
    }

    #[test]
    fn test_y_bounds_pads_and_clamps_at_zero() {
        assert_eq!(y_bounds(Some((0.0, 10.0)), None), [0.0, 11.0]);

        let [lo, hi] = y_bounds(Some((1000.0, 1100.0)), None);
        assert!((lo - 989.0).abs() < 1e-9);
        assert!((hi - 1111.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_bounds_flat_series() {
        assert_eq!(y_bounds(Some((0.0, 0.0)), None), [0.0, 1.0]);
        assert_eq!(y_bounds(None, None), [0.0, 1.0]);

        let [lo, hi] = y_bounds(Some((500.0, 500.0)), None);
        assert!(lo < 500.0 && hi > 500.0);
    }
}
