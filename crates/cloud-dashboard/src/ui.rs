//! Widget builders shared by the panes.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Gauge, Row, Table},
};

use crate::classify::{Bucket, Histogram, Problem};
use crate::theme::Theme;

const BAR_WIDTH: u16 = 5;
const BAR_GAP: u16 = 10;

/// Clip `rect` to `bounds` so widgets never draw outside the frame.
#[must_use]
pub fn fit(rect: Rect, bounds: Rect) -> Rect {
    rect.intersection(bounds)
}

/// Bar chart of a histogram. `None` draws every bar at zero.
pub fn bar_chart<'a, B: Bucket>(
    title: &'a str,
    data: Option<&Histogram<B>>,
    theme: &Theme,
) -> BarChart<'a> {
    let bars: Vec<Bar> = B::ALL
        .iter()
        .map(|bucket| {
            let value = data.map_or(0, |h| h.count(*bucket));
            Bar::default()
                .value(value)
                .label(Line::from(bucket.label()))
                .style(Style::default().fg(bucket.color()))
                .value_style(Style::default().fg(theme.bar_value).bg(bucket.color()))
        })
        .collect();

    BarChart::default()
        .block(theme.block(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .label_style(theme.bar_label)
}

/// Percentage gauge. `None` draws an empty gauge without a number.
pub fn gauge<'a>(title: &'a str, percent: Option<u16>, color: Color, theme: &Theme) -> Gauge<'a> {
    let gauge = Gauge::default()
        .block(theme.block(title))
        .gauge_style(Style::default().fg(color))
        .style(theme.gauge_label);
    match percent {
        Some(p) => gauge.percent(p.min(100)).label(format!("{p}%")),
        None => gauge.percent(0).label(""),
    }
}

/// Table of problems: resource, time, message.
pub fn problem_table<'a>(title: &'a str, problems: &[Problem], theme: &Theme) -> Table<'a> {
    let rows: Vec<Row> = problems
        .iter()
        .map(|p| {
            Row::new(vec![
                p.resource.clone(),
                p.time.format("%Y-%m-%d %H:%M").to_string(),
                p.message.clone(),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Min(0),
        ],
    )
    .block(theme.block(title))
    .style(theme.text)
    .column_spacing(1)
}

/// Render a byte count with binary units, e.g. `1.5 GiB`.
#[must_use]
pub fn humanize_size(bytes: i64) -> String {
    const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    let bytes = bytes.max(0);
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
