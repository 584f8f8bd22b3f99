//! View selection and dispatch.
//!
//! [`ViewKind`] is the closed set of analyses the dashboard offers.
//! [`ViewRequest`] carries one view's picker selections, and [`render_view`]
//! turns a request into a [`Report`] with one handler per variant.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{self, GroupStat};
use crate::config::AnalysisSettings;
use crate::record::{Dataset, Field, PriceRecord};
use crate::report::{
    AxisRange, BarChart, ChartSpec, LineChart, Orientation, Point, Report, Series, TableBlock,
};
use crate::supplementary::SupplementaryAnalysis;

/// The analyses offered in the sidebar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    DataPreview,
    PriceTrendsByProduce,
    ComparisonByMarketType,
    ComparisonByCountry,
    AveragePriceByCountry,
    AveragePriceByItem,
    PriceTrendByCountry,
    PriceTrendByItem,
}

impl ViewKind {
    pub const ALL: [ViewKind; 8] = [
        ViewKind::DataPreview,
        ViewKind::PriceTrendsByProduce,
        ViewKind::ComparisonByMarketType,
        ViewKind::ComparisonByCountry,
        ViewKind::AveragePriceByCountry,
        ViewKind::AveragePriceByItem,
        ViewKind::PriceTrendByCountry,
        ViewKind::PriceTrendByItem,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::DataPreview => "Data Preview",
            ViewKind::PriceTrendsByProduce => "Price Trends by Produce",
            ViewKind::ComparisonByMarketType => "Comparison by Market Type",
            ViewKind::ComparisonByCountry => "Comparison by Country",
            ViewKind::AveragePriceByCountry => "Average Price by Country",
            ViewKind::AveragePriceByItem => "Average Price by Item",
            ViewKind::PriceTrendByCountry => "Price Trend by Country",
            ViewKind::PriceTrendByItem => "Price Trend by Item",
        }
    }

    /// Kebab-case identifier, e.g. `price-trend-by-item`.
    pub fn slug(self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }

    pub fn index(self) -> usize {
        ViewKind::ALL
            .iter()
            .position(|&v| v == self)
            .unwrap_or_default()
    }

    pub fn from_index(i: usize) -> Option<Self> {
        ViewKind::ALL.get(i).copied()
    }

    pub fn next(self) -> ViewKind {
        ViewKind::ALL[(self.index() + 1) % ViewKind::ALL.len()]
    }

    pub fn prev(self) -> ViewKind {
        ViewKind::ALL[(self.index() + ViewKind::ALL.len() - 1) % ViewKind::ALL.len()]
    }

    /// The pickers shown above this view's output, top to bottom.
    pub fn pickers(self) -> &'static [PickerSpec] {
        const PRODUCE_MULTI: PickerSpec = PickerSpec {
            field: PickerField::Produce,
            mode: PickerMode::Multi,
            label: "Select produce",
        };
        const PRODUCE_SINGLE: PickerSpec = PickerSpec {
            field: PickerField::Produce,
            mode: PickerMode::Single,
            label: "Select Produce",
        };
        match self {
            ViewKind::DataPreview
            | ViewKind::AveragePriceByCountry
            | ViewKind::AveragePriceByItem => &[],
            ViewKind::PriceTrendsByProduce => &[PRODUCE_MULTI],
            ViewKind::ComparisonByMarketType => &[
                PickerSpec {
                    field: PickerField::MarketType,
                    mode: PickerMode::Multi,
                    label: "Choose Market Type",
                },
                PRODUCE_SINGLE,
            ],
            ViewKind::ComparisonByCountry => &[
                PRODUCE_SINGLE,
                PickerSpec {
                    field: PickerField::Country,
                    mode: PickerMode::Multi,
                    label: "Choose Country",
                },
            ],
            ViewKind::PriceTrendByCountry => &[PickerSpec {
                field: PickerField::Country,
                mode: PickerMode::Multi,
                label: "Select Country",
            }],
            ViewKind::PriceTrendByItem => &[PickerSpec {
                field: PickerField::Produce,
                mode: PickerMode::Multi,
                label: "Select Produce",
            }],
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownView(pub String);

impl fmt::Display for UnknownView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown view '{}'", self.0)
    }
}

impl std::error::Error for UnknownView {}

impl FromStr for ViewKind {
    type Err = UnknownView;

    /// Accepts the label (any case) or the kebab-case slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        ViewKind::ALL
            .into_iter()
            .find(|v| v.label().to_lowercase() == wanted)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// Column a picker selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickerField {
    Produce,
    MarketType,
    Country,
}

impl PickerField {
    pub fn field(self) -> Field {
        match self {
            PickerField::Produce => Field::Produce,
            PickerField::MarketType => Field::MarketType,
            PickerField::Country => Field::Country,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickerMode {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerSpec {
    pub field: PickerField,
    pub mode: PickerMode,
    pub label: &'static str,
}

/// A view together with its picker selections.
///
/// Multi-select lists keep the order in which values were picked; charts are
/// laid out in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewRequest {
    DataPreview,
    PriceTrendsByProduce {
        produce: Vec<String>,
    },
    ComparisonByMarketType {
        produce: Option<String>,
        market_types: Vec<String>,
    },
    ComparisonByCountry {
        produce: Option<String>,
        countries: Vec<String>,
    },
    AveragePriceByCountry,
    AveragePriceByItem,
    PriceTrendByCountry {
        countries: Vec<String>,
    },
    PriceTrendByItem {
        produce: Vec<String>,
    },
}

fn first_n(values: Vec<String>, n: usize) -> Vec<String> {
    values.into_iter().take(n).collect()
}

fn dedup_keep_order(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

impl ViewRequest {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewRequest::DataPreview => ViewKind::DataPreview,
            ViewRequest::PriceTrendsByProduce { .. } => ViewKind::PriceTrendsByProduce,
            ViewRequest::ComparisonByMarketType { .. } => ViewKind::ComparisonByMarketType,
            ViewRequest::ComparisonByCountry { .. } => ViewKind::ComparisonByCountry,
            ViewRequest::AveragePriceByCountry => ViewKind::AveragePriceByCountry,
            ViewRequest::AveragePriceByItem => ViewKind::AveragePriceByItem,
            ViewRequest::PriceTrendByCountry { .. } => ViewKind::PriceTrendByCountry,
            ViewRequest::PriceTrendByItem { .. } => ViewKind::PriceTrendByItem,
        }
    }

    /// A request with nothing selected.
    pub fn empty(view: ViewKind) -> Self {
        match view {
            ViewKind::DataPreview => ViewRequest::DataPreview,
            ViewKind::PriceTrendsByProduce => ViewRequest::PriceTrendsByProduce {
                produce: Vec::new(),
            },
            ViewKind::ComparisonByMarketType => ViewRequest::ComparisonByMarketType {
                produce: None,
                market_types: Vec::new(),
            },
            ViewKind::ComparisonByCountry => ViewRequest::ComparisonByCountry {
                produce: None,
                countries: Vec::new(),
            },
            ViewKind::AveragePriceByCountry => ViewRequest::AveragePriceByCountry,
            ViewKind::AveragePriceByItem => ViewRequest::AveragePriceByItem,
            ViewKind::PriceTrendByCountry => ViewRequest::PriceTrendByCountry {
                countries: Vec::new(),
            },
            ViewKind::PriceTrendByItem => ViewRequest::PriceTrendByItem {
                produce: Vec::new(),
            },
        }
    }

    /// The selections a view starts with when it is first opened.
    pub fn default_for(view: ViewKind, dataset: &Dataset) -> Self {
        let table = &dataset.extended;
        match view {
            ViewKind::ComparisonByMarketType => ViewRequest::ComparisonByMarketType {
                produce: table.distinct(Field::Produce).into_iter().next(),
                market_types: first_n(table.distinct(Field::MarketType), 1),
            },
            ViewKind::ComparisonByCountry => {
                let produce = table.distinct(Field::Produce).into_iter().next();
                let countries = default_countries_for(dataset, produce.as_deref());
                ViewRequest::ComparisonByCountry { produce, countries }
            }
            ViewKind::PriceTrendByCountry => ViewRequest::PriceTrendByCountry {
                countries: first_n(table.distinct(Field::Country), 2),
            },
            ViewKind::PriceTrendByItem => ViewRequest::PriceTrendByItem {
                produce: first_n(table.distinct(Field::Produce), 2),
            },
            other => ViewRequest::empty(other),
        }
    }

    /// Current selection for a picker field (empty when the view has no such picker).
    pub fn selection(&self, field: PickerField) -> &[String] {
        match (self, field) {
            (ViewRequest::PriceTrendsByProduce { produce }, PickerField::Produce)
            | (ViewRequest::PriceTrendByItem { produce }, PickerField::Produce) => produce,
            (ViewRequest::ComparisonByMarketType { produce, .. }, PickerField::Produce)
            | (ViewRequest::ComparisonByCountry { produce, .. }, PickerField::Produce) => {
                produce.as_slice()
            }
            (ViewRequest::ComparisonByMarketType { market_types, .. }, PickerField::MarketType) => {
                market_types
            }
            (ViewRequest::ComparisonByCountry { countries, .. }, PickerField::Country)
            | (ViewRequest::PriceTrendByCountry { countries }, PickerField::Country) => countries,
            _ => &[],
        }
    }

    /// Replace a picker's selection. Single-select fields keep the first value.
    ///
    /// Changing the produce of "Comparison by Country" changes the country
    /// options, so the country selection falls back to its defaults.
    pub fn apply_selection(&mut self, dataset: &Dataset, field: PickerField, values: Vec<String>) {
        let values = dedup_keep_order(values);
        match (self, field) {
            (ViewRequest::PriceTrendsByProduce { produce }, PickerField::Produce)
            | (ViewRequest::PriceTrendByItem { produce }, PickerField::Produce) => {
                *produce = values;
            }
            (ViewRequest::ComparisonByMarketType { produce, .. }, PickerField::Produce) => {
                *produce = values.into_iter().next();
            }
            (ViewRequest::ComparisonByMarketType { market_types, .. }, PickerField::MarketType) => {
                *market_types = values;
            }
            (ViewRequest::ComparisonByCountry { produce, countries }, PickerField::Produce) => {
                let next = values.into_iter().next();
                if next != *produce {
                    *countries = default_countries_for(dataset, next.as_deref());
                    *produce = next;
                }
            }
            (ViewRequest::ComparisonByCountry { countries, .. }, PickerField::Country)
            | (ViewRequest::PriceTrendByCountry { countries }, PickerField::Country) => {
                *countries = values;
            }
            _ => {}
        }
    }
}

fn default_countries_for(dataset: &Dataset, produce: Option<&str>) -> Vec<String> {
    match produce {
        Some(p) => first_n(
            dataset
                .extended
                .distinct_where(Field::Country, Field::Produce, p),
            2,
        ),
        None => Vec::new(),
    }
}

/// Values a picker offers, in first-seen order of the extended table.
pub fn picker_options(dataset: &Dataset, request: &ViewRequest, field: PickerField) -> Vec<String> {
    let table = &dataset.extended;
    match (request, field) {
        (ViewRequest::ComparisonByCountry { produce, .. }, PickerField::Country) => match produce {
            Some(p) => table.distinct_where(Field::Country, Field::Produce, p),
            None => Vec::new(),
        },
        _ => table.distinct(field.field()),
    }
}

/// Run the handler for `request` and collect its output.
pub fn render_view(
    dataset: &Dataset,
    request: &ViewRequest,
    settings: &AnalysisSettings,
) -> Report {
    let kind = request.kind();
    let mut report = Report::new(kind);
    match request {
        ViewRequest::DataPreview => data_preview(&mut report, dataset, settings),
        ViewRequest::PriceTrendsByProduce { produce } => {
            price_trends_by_produce(&mut report, dataset, produce)
        }
        ViewRequest::ComparisonByMarketType {
            produce,
            market_types,
        } => comparison_by_market_type(&mut report, dataset, produce.as_deref(), market_types),
        ViewRequest::ComparisonByCountry { produce, countries } => {
            comparison_by_country(&mut report, dataset, produce.as_deref(), countries)
        }
        ViewRequest::AveragePriceByCountry => average_price_by(
            &mut report,
            dataset,
            Field::Country,
            "Average Price by Country",
            "Country",
        ),
        ViewRequest::AveragePriceByItem => average_price_by(
            &mut report,
            dataset,
            Field::Produce,
            "Average Price by Item (Produce)",
            "Produce",
        ),
        ViewRequest::PriceTrendByCountry { countries } => price_trend_by(
            &mut report,
            dataset,
            Field::Country,
            countries,
            "Price Trend by Country",
            "Yearly Price Trend by Country",
        ),
        ViewRequest::PriceTrendByItem { produce } => {
            price_trend_by(
                &mut report,
                dataset,
                Field::Produce,
                produce,
                "Price Trend by Produce Item",
                "Yearly Price Trend by Item",
            );
            // Runs whatever items were picked, including none.
            SupplementaryAnalysis::compute(&dataset.base, settings).append_to(&mut report);
        }
    }
    debug!(view = %kind, blocks = report.blocks.len(), "rendered view");
    report
}

// ── Handlers ─────────────────────────────────────────────────────────

fn data_preview(report: &mut Report, dataset: &Dataset, settings: &AnalysisSettings) {
    let table = &dataset.base;
    let amount = settings.preview_rows.min(table.len());
    let mut rng = match settings.preview_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let rows: Vec<&PriceRecord> = rand::seq::index::sample(&mut rng, table.len(), amount)
        .into_iter()
        .map(|i| &table.records[i])
        .collect();
    report.table(TableBlock::from_records(&table.columns, &rows));
}

/// Points of one category's (category, year) means, in year order.
fn year_series(stats: &[GroupStat<(String, i32)>], category: &str) -> Series {
    let points = stats
        .iter()
        .filter(|s| s.key.0 == category)
        .filter_map(|s| {
            s.value.map(|y| Point {
                x: f64::from(s.key.1),
                y,
            })
        })
        .collect();
    Series::new(category, points)
}

fn price_trends_by_produce(report: &mut Report, dataset: &Dataset, selected: &[String]) {
    if selected.is_empty() {
        return;
    }
    let stats = aggregate::mean_by_category_year(
        dataset
            .extended
            .records
            .iter()
            .filter(|r| aggregate::is_selected(r, Field::Produce, selected)),
        Field::Produce,
    );
    let charts = selected
        .iter()
        .map(|produce| {
            ChartSpec::Line(
                LineChart::new(
                    format!("Price Trend Over Time - {produce}"),
                    "Year",
                    "Average Price",
                )
                .with_series(year_series(&stats, produce)),
            )
        })
        .collect();
    report.charts(charts);
}

fn comparison_by_market_type(
    report: &mut Report,
    dataset: &Dataset,
    produce: Option<&str>,
    market_types: &[String],
) {
    let Some(produce) = produce else { return };
    if market_types.is_empty() {
        return;
    }
    let stats = aggregate::mean_by_category_year(
        dataset.extended.records.iter().filter(|r| {
            r.produce.as_deref() == Some(produce)
                && aggregate::is_selected(r, Field::MarketType, market_types)
        }),
        Field::MarketType,
    );
    // One range across every selected market type keeps the facets comparable.
    let shared = aggregate::value_range(stats.iter().filter_map(|s| s.value))
        .map(|(min, max)| AxisRange { min, max });

    let charts = market_types
        .iter()
        .map(|mt| {
            ChartSpec::Line(
                LineChart::new(
                    format!("Price Trend Over Time for {produce} - {mt}"),
                    "Year",
                    "Average Price",
                )
                .with_series(year_series(&stats, mt))
                .with_y_range(shared),
            )
        })
        .collect();
    report.charts(charts);
}

fn comparison_by_country(
    report: &mut Report,
    dataset: &Dataset,
    produce: Option<&str>,
    countries: &[String],
) {
    let Some(produce) = produce else { return };
    if countries.is_empty() {
        return;
    }
    let stats = aggregate::mean_by_category_year(
        dataset.extended.records.iter().filter(|r| {
            r.produce.as_deref() == Some(produce)
                && aggregate::is_selected(r, Field::Country, countries)
        }),
        Field::Country,
    );
    let charts = countries
        .iter()
        .map(|country| {
            ChartSpec::Line(
                LineChart::new(
                    format!("Price Trend Over Time in {country} for {produce}"),
                    "Year",
                    "Average Price",
                )
                .with_series(year_series(&stats, country)),
            )
        })
        .collect();
    report.charts(charts);
}

fn average_price_by(
    report: &mut Report,
    dataset: &Dataset,
    field: Field,
    title: &str,
    category_label: &str,
) {
    let ranked = aggregate::rank_descending(aggregate::mean_by(&dataset.extended.records, field));
    report.heading(title);
    report.chart(ChartSpec::Bar(
        BarChart::new(title, category_label, "Average Price", Orientation::Horizontal)
            .with_bars(ranked.into_iter().map(|r| (r.label, r.value))),
    ));
}

fn price_trend_by(
    report: &mut Report,
    dataset: &Dataset,
    field: Field,
    selected: &[String],
    heading: &str,
    title: &str,
) {
    if selected.is_empty() {
        return;
    }
    let stats = aggregate::mean_by_category_year(
        dataset
            .extended
            .records
            .iter()
            .filter(|r| aggregate::is_selected(r, field, selected)),
        field,
    );
    let chart = selected.iter().fold(
        LineChart::new(title, "Year", "Average Price").with_legend(),
        |chart, category| chart.with_series(year_series(&stats, category)),
    );
    report.heading(heading);
    report.chart(ChartSpec::Line(chart));
}
