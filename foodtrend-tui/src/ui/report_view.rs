//! Report area: the report's blocks stacked top to bottom on a virtual
//! canvas, shown from the scroll line downwards.
//!
//! Each visible block is drawn at full height into a scratch buffer and the
//! rows inside the viewport are copied to the frame, so a block taller than
//! the screen (a long ranking, the preview table) can be scrolled through.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Widget, Wrap};
use ratatui::Frame;

use foodtrend_core::report::{Block as ReportBlock, ChartSpec, Report, TableBlock};

use crate::app::AppState;
use crate::theme;
use crate::ui::charts;

/// Charts placed side by side before wrapping to a new row.
const CHARTS_PER_ROW: usize = 3;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let frame = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" {} ", app.view.label()))
        .title_style(theme::accent_bold());
    let inner = frame.inner(area);
    f.render_widget(frame, area);
    app.report_viewport.set((inner.width, inner.height));

    if app.report.is_empty() {
        render_empty(f, inner);
        return;
    }

    let offset = app.scroll.min(max_scroll(&app.report, inner.width, inner.height));
    let bottom = offset + usize::from(inner.height);
    let mut top = 0usize;
    for block in &app.report.blocks {
        let height = block_height(block, inner.width);
        let start = top;
        top += usize::from(height);
        if top <= offset {
            continue;
        }
        if start >= bottom {
            break;
        }
        render_clipped(f.buffer_mut(), inner, block, height, start, offset);
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Nothing selected. Press Tab and choose values in the pickers above.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Total lines the report occupies at `width` columns.
pub fn content_height(report: &Report, width: u16) -> usize {
    report
        .blocks
        .iter()
        .map(|b| usize::from(block_height(b, width)))
        .sum()
}

/// Largest scroll line that still fills a viewport of `height` lines.
pub fn max_scroll(report: &Report, width: u16, height: u16) -> usize {
    content_height(report, width).saturating_sub(usize::from(height))
}

fn block_height(block: &ReportBlock, width: u16) -> u16 {
    match block {
        ReportBlock::Heading { .. } => 2,
        ReportBlock::Text { text } => {
            let width = usize::from(width.max(1));
            let lines = text.chars().count().div_ceil(width).max(1);
            u16::try_from(lines).unwrap_or(u16::MAX)
        }
        ReportBlock::Table(table) => {
            let rows = u16::try_from(table.rows.len()).unwrap_or(u16::MAX);
            rows.saturating_add(3)
        }
        ReportBlock::Charts { charts } => charts
            .chunks(CHARTS_PER_ROW)
            .map(row_height)
            .fold(0u16, u16::saturating_add),
    }
}

fn row_height(specs: &[ChartSpec]) -> u16 {
    specs.iter().map(charts::height).max().unwrap_or(charts::CHART_HEIGHT)
}

/// Draw `block` whose first line sits at canvas line `start`, keeping only
/// the rows that fall inside `viewport` when the canvas is scrolled to `offset`.
fn render_clipped(
    buf: &mut Buffer,
    viewport: Rect,
    block: &ReportBlock,
    height: u16,
    start: usize,
    offset: usize,
) {
    let area = Rect::new(viewport.x, 0, viewport.width, height);
    let mut scratch = Buffer::empty(area);
    render_block(&mut scratch, area, block);

    for row in 0..height {
        let line = start + usize::from(row);
        if line < offset {
            continue;
        }
        let Ok(screen_row) = u16::try_from(line - offset) else {
            break;
        };
        if screen_row >= viewport.height {
            break;
        }
        let y = viewport.y + screen_row;
        for x in viewport.left()..viewport.right() {
            if let (Some(src), Some(dst)) = (scratch.cell((x, row)), buf.cell_mut((x, y))) {
                *dst = src.clone();
            }
        }
    }
}

fn render_block(buf: &mut Buffer, area: Rect, block: &ReportBlock) {
    match block {
        ReportBlock::Heading { text } => {
            Paragraph::new(Line::from(Span::styled(text.as_str(), theme::accent_bold())))
                .render(area, buf);
        }
        ReportBlock::Text { text } => {
            Paragraph::new(Span::styled(text.as_str(), theme::text()))
                .wrap(Wrap { trim: true })
                .render(area, buf);
        }
        ReportBlock::Table(table) => render_table(buf, area, table),
        ReportBlock::Charts { charts } => render_chart_rows(buf, area, charts),
    }
}

fn render_table(buf: &mut Buffer, area: Rect, table: &TableBlock) {
    let columns = table.columns.len();
    let widths = vec![Constraint::Ratio(1, columns.max(1) as u32); columns];
    let header = Row::new(table.columns.iter().map(String::as_str)).style(theme::accent_bold());
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(String::as_str)).style(theme::text()));
    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted()),
        )
        .render(area, buf);
}

fn render_chart_rows(buf: &mut Buffer, area: Rect, specs: &[ChartSpec]) {
    let row_specs: Vec<&[ChartSpec]> = specs.chunks(CHARTS_PER_ROW).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            row_specs
                .iter()
                .map(|row| Constraint::Length(row_height(row)))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (row_area, row) in rows.iter().zip(row_specs) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, row.len() as u32); row.len()])
            .split(*row_area);
        for (cell, spec) in cells.iter().zip(row) {
            charts::render(buf, *cell, spec);
        }
    }
}
