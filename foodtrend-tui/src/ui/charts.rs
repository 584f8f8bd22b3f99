//! Chart rendering: line charts via ratatui `Chart`, bar charts via `BarChart`.

use ratatui::buffer::Buffer;
use ratatui::layout::{Direction, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart as BarWidget, BarGroup, Block, Borders, Chart, Dataset, GraphType,
    Paragraph, Widget,
};

use foodtrend_core::report::{AxisRange, BarChart, ChartSpec, LineChart, Orientation};

use crate::theme;

/// Bars are drawn at integer heights out of this many steps.
const BAR_SCALE: u64 = 1000;
/// Rows given to a line chart or a vertical bar chart.
pub const CHART_HEIGHT: u16 = 18;
/// Smallest frame that still shows a "No data" line.
const MIN_HEIGHT: u16 = 5;

/// Rows `spec` needs to be drawn in full. Horizontal bar charts take one row
/// per bar plus the frame.
pub fn height(spec: &ChartSpec) -> u16 {
    match spec {
        ChartSpec::Bar(chart) if chart.orientation == Orientation::Horizontal => {
            let bars = u16::try_from(chart.bars.len()).unwrap_or(u16::MAX);
            bars.saturating_add(2).max(MIN_HEIGHT)
        }
        _ => CHART_HEIGHT,
    }
}

pub fn render(buf: &mut Buffer, area: Rect, spec: &ChartSpec) {
    match spec {
        ChartSpec::Line(chart) => render_line(buf, area, chart),
        ChartSpec::Bar(chart) => render_bar(buf, area, chart),
    }
}

fn frame(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" {title} "))
        .title_style(theme::accent_bold())
}

fn render_no_data(buf: &mut Buffer, area: Rect, title: &str) {
    Paragraph::new(Line::from(Span::styled("No data", theme::muted())))
        .block(frame(title))
        .render(area, buf);
}

/// Bounds for an axis. A fixed range is used as is; autoscaled ranges get 5%
/// padding. Degenerate ranges are widened so the axis has extent.
pub fn axis_bounds(range: AxisRange, pad: bool) -> [f64; 2] {
    let span = range.max - range.min;
    if span <= 0.0 {
        let half = if range.min == 0.0 { 1.0 } else { range.min.abs() * 0.05 };
        return [range.min - half, range.max + half];
    }
    let padding = if pad { span * 0.05 } else { 0.0 };
    [range.min - padding, range.max + padding]
}

fn axis_labels(bounds: [f64; 2], decimals: usize) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::styled(format!("{v:.decimals$}"), theme::muted()))
        .collect()
}

fn render_line(buf: &mut Buffer, area: Rect, chart: &LineChart) {
    let (Some(x_range), Some(y_range)) = (chart.x_range(), chart.effective_y_range()) else {
        render_no_data(buf, area, &chart.title);
        return;
    };

    let x_bounds = axis_bounds(x_range, false);
    let y_bounds = axis_bounds(y_range, chart.y_range.is_none());

    let data: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| s.points.iter().map(|p| (p.x, p.y)).collect())
        .collect();

    let mut datasets = Vec::new();
    for (i, (series, points)) in chart.series.iter().zip(&data).enumerate() {
        let style = Style::default().fg(theme::series_color(i));
        let mut line = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(style)
            .data(points);
        if chart.show_legend {
            line = line.name(series.name.clone());
        }
        datasets.push(line);
        if chart.show_markers {
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(style)
                    .data(points),
            );
        }
    }

    let widget = Chart::new(datasets)
        .block(frame(&chart.title))
        .x_axis(
            Axis::default()
                .title(Span::styled(chart.x_label.clone(), theme::muted()))
                .style(theme::muted())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, 0)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(chart.y_label.clone(), theme::muted()))
                .style(theme::muted())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, 2)),
        );
    widget.render(area, buf);
}

/// Integer bar height for `value` on a scale where `max` fills the bar.
pub fn scaled_height(value: f64, max: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 || max <= 0.0 {
        return 0;
    }
    ((value / max) * BAR_SCALE as f64).round() as u64
}

fn render_bar(buf: &mut Buffer, area: Rect, chart: &BarChart) {
    let Some(max) = chart.max_value() else {
        render_no_data(buf, area, &chart.title);
        return;
    };

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::default()
                .value(scaled_height(b.value, max))
                .text_value(format!("{:.2}", b.value))
                .label(Line::from(b.label.clone()))
                .style(Style::default().fg(theme::series_color(i)))
        })
        .collect();

    let title = format!("{} ({} by {})", chart.title, chart.value_label, chart.category_label);
    let mut widget = BarWidget::default()
        .block(frame(&title))
        .data(BarGroup::default().bars(&bars))
        .max(BAR_SCALE)
        .value_style(theme::text());

    widget = match chart.orientation {
        Orientation::Horizontal => widget
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0),
        Orientation::Vertical => {
            let inner = area.width.saturating_sub(2) as usize;
            let n = chart.bars.len().max(1);
            let width = (inner / n).saturating_sub(1).clamp(1, 12) as u16;
            widget.bar_width(width).bar_gap(1)
        }
    };
    widget.render(area, buf);
}
