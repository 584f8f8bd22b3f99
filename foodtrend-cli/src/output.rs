//! Report printers: aligned text, JSON, and long-format CSV.

use std::collections::BTreeSet;
use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;

use foodtrend_core::report::{BarChart, Block, ChartSpec, LineChart, Report, TableBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Csv,
}

pub fn write_report<W: Write>(out: &mut W, report: &Report, format: Format) -> Result<()> {
    match format {
        Format::Text => write_text(out, report)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        Format::Csv => write_csv(out, report)?,
    }
    Ok(())
}

// ── Text ─────────────────────────────────────────────────────────────

/// Pad every column to its widest cell. The first column is left-aligned,
/// the rest right-aligned.
fn aligned(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(c, cell)| {
                    if c == 0 {
                        format!("{cell:<w$}", w = widths[c])
                    } else {
                        format!("{cell:>w$}", w = widths[c])
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

fn format_x(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{x:.0}")
    } else {
        format!("{x}")
    }
}

pub fn write_text<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "# {}", report.view)?;
    if report.is_empty() {
        writeln!(out)?;
        writeln!(out, "(nothing selected)")?;
        return Ok(());
    }
    for block in &report.blocks {
        writeln!(out)?;
        match block {
            Block::Heading { text } => {
                writeln!(out, "{text}")?;
                writeln!(out, "{}", "=".repeat(text.chars().count()))?;
            }
            Block::Text { text } => writeln!(out, "{text}")?,
            Block::Table(table) => write_table(out, table)?,
            Block::Charts { charts } => {
                for (i, chart) in charts.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    match chart {
                        ChartSpec::Line(line) => write_line_chart(out, line)?,
                        ChartSpec::Bar(bar) => write_bar_chart(out, bar)?,
                    }
                }
            }
        }
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, table: &TableBlock) -> io::Result<()> {
    let mut rows = vec![table.columns.clone()];
    rows.extend(table.rows.iter().cloned());
    for line in aligned(&rows) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// One row per x value, one column per series; `-` where a series has no point.
fn write_line_chart<W: Write>(out: &mut W, chart: &LineChart) -> io::Result<()> {
    writeln!(out, "[{}]", chart.title)?;
    if let Some(range) = chart.y_range {
        writeln!(out, "y range: {:.2} .. {:.2}", range.min, range.max)?;
    }
    let xs: BTreeSet<u64> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.x.to_bits()))
        .collect();
    let mut xs: Vec<f64> = xs.into_iter().map(f64::from_bits).collect();
    xs.sort_by(f64::total_cmp);

    let mut rows = Vec::with_capacity(xs.len() + 1);
    let mut header = vec![chart.x_label.clone()];
    header.extend(chart.series.iter().map(|s| s.name.clone()));
    rows.push(header);
    for x in xs {
        let mut row = vec![format_x(x)];
        for series in &chart.series {
            let cell = series
                .points
                .iter()
                .find(|p| p.x == x)
                .map(|p| format!("{:.2}", p.y))
                .unwrap_or_else(|| "-".to_string());
            row.push(cell);
        }
        rows.push(row);
    }
    for line in aligned(&rows) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_bar_chart<W: Write>(out: &mut W, chart: &BarChart) -> io::Result<()> {
    writeln!(out, "[{}]", chart.title)?;
    let mut rows = vec![vec![chart.category_label.clone(), chart.value_label.clone()]];
    rows.extend(
        chart
            .bars
            .iter()
            .map(|b| vec![b.label.clone(), format!("{:.2}", b.value)]),
    );
    for line in aligned(&rows) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

// ── CSV ──────────────────────────────────────────────────────────────

/// Every chart point as a `chart,series,x,y` row. Bar charts use the value
/// label as series and the category as x.
pub fn write_csv<W: Write>(out: W, report: &Report) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["chart", "series", "x", "y"])?;
    for chart in report.all_charts() {
        match chart {
            ChartSpec::Line(line) => {
                for series in &line.series {
                    for p in &series.points {
                        let x = format_x(p.x);
                        let y = p.y.to_string();
                        writer.write_record([&line.title, &series.name, &x, &y])?;
                    }
                }
            }
            ChartSpec::Bar(bar) => {
                for b in &bar.bars {
                    let y = b.value.to_string();
                    writer.write_record([&bar.title, &bar.value_label, &b.label, &y])?;
                }
            }
        }
    }
    writer.flush()?;
    Ok(())
}
