//! Render model. What a view produces, independent of any drawing backend.
//!
//! A [`Report`] is an ordered list of blocks. The terminal dashboard draws
//! them with ratatui widgets; the CLI prints or serializes them.

use serde::Serialize;

use crate::record::{Field, PriceRecord};
use crate::view::ViewKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub view: ViewKind,
    pub blocks: Vec<Block>,
}

impl Report {
    pub fn new(view: ViewKind) -> Self {
        Self {
            view,
            blocks: Vec::new(),
        }
    }

    /// True for the empty-selection state: nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn heading(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Heading { text: text.into() });
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Text { text: text.into() });
    }

    pub fn table(&mut self, table: TableBlock) {
        self.blocks.push(Block::Table(table));
    }

    pub fn charts(&mut self, charts: Vec<ChartSpec>) {
        self.blocks.push(Block::Charts { charts });
    }

    pub fn chart(&mut self, chart: ChartSpec) {
        self.charts(vec![chart]);
    }

    /// Every chart in the report, in order.
    pub fn all_charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Charts { charts } => Some(charts),
                _ => None,
            })
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { text: String },
    Text { text: String },
    Table(TableBlock),
    /// Charts laid out side by side.
    Charts { charts: Vec<ChartSpec> },
}

/// Plain text grid (used by the data preview).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableBlock {
    pub fn from_records(columns: &[Field], records: &[&PriceRecord]) -> Self {
        Self {
            columns: columns.iter().map(|f| f.column_name().to_string()).collect(),
            rows: records
                .iter()
                .map(|r| columns.iter().map(|&f| r.display_cell(f)).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Line(LineChart),
    Bar(BarChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line(c) => &c.title,
            ChartSpec::Bar(c) => &c.title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Local (min, max) of the y values.
    pub fn y_range(&self) -> Option<AxisRange> {
        crate::aggregate::value_range(self.points.iter().map(|p| p.y))
            .map(|(min, max)| AxisRange { min, max })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    /// Fixed y bounds; `None` means autoscale to this chart's own data.
    pub y_range: Option<AxisRange>,
    pub show_markers: bool,
    pub show_legend: bool,
}

impl LineChart {
    pub fn new(title: impl Into<String>, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
            y_range: None,
            show_markers: true,
            show_legend: false,
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_y_range(mut self, range: Option<AxisRange>) -> Self {
        self.y_range = range;
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.show_legend = true;
        self
    }

    /// The y bounds a renderer should use: the fixed range if set, otherwise
    /// the span of all plotted points.
    pub fn effective_y_range(&self) -> Option<AxisRange> {
        self.y_range.or_else(|| {
            crate::aggregate::value_range(
                self.series.iter().flat_map(|s| s.points.iter().map(|p| p.y)),
            )
            .map(|(min, max)| AxisRange { min, max })
        })
    }

    pub fn x_range(&self) -> Option<AxisRange> {
        crate::aggregate::value_range(
            self.series.iter().flat_map(|s| s.points.iter().map(|p| p.x)),
        )
        .map(|(min, max)| AxisRange { min, max })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Categories down the side, bars grow left to right.
    Horizontal,
    /// Categories along the bottom, bars grow upward.
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarValue {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    pub orientation: Orientation,
    pub bars: Vec<BarValue>,
}

impl BarChart {
    pub fn new(
        title: impl Into<String>,
        category_label: &str,
        value_label: &str,
        orientation: Orientation,
    ) -> Self {
        Self {
            title: title.into(),
            category_label: category_label.to_string(),
            value_label: value_label.to_string(),
            orientation,
            bars: Vec::new(),
        }
    }

    pub fn with_bars<I>(mut self, bars: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        self.bars
            .extend(bars.into_iter().map(|(label, value)| BarValue { label, value }));
        self
    }

    pub fn max_value(&self) -> Option<f64> {
        crate::aggregate::value_range(self.bars.iter().map(|b| b.value)).map(|(_, max)| max)
    }
}
