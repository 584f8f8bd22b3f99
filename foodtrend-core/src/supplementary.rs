//! Market-type analysis appended to "Price Trend by Item".
//!
//! Works on the base table restricted to years after
//! [`AnalysisSettings::min_year_exclusive`].

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{self, Ranked};
use crate::config::AnalysisSettings;
use crate::record::{Field, PriceRecord, PriceTable};
use crate::report::{BarChart, ChartSpec, LineChart, Orientation, Point, Report, Series};
use crate::stats::{self, TTestResult};

/// The three market types compared pairwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarketType {
    Retail,
    Wholesale,
    Producer,
}

impl MarketType {
    pub const ALL: [MarketType; 3] = [
        MarketType::Retail,
        MarketType::Wholesale,
        MarketType::Producer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarketType::Retail => "Retail",
            MarketType::Wholesale => "Wholesale",
            MarketType::Producer => "Producer",
        }
    }

    /// Comparison order: Retail/Wholesale, Retail/Producer, Wholesale/Producer.
    pub fn pairs() -> [(MarketType, MarketType); 3] {
        [
            (MarketType::Retail, MarketType::Wholesale),
            (MarketType::Retail, MarketType::Producer),
            (MarketType::Wholesale, MarketType::Producer),
        ]
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseTest {
    pub first: MarketType,
    pub second: MarketType,
    pub result: TTestResult,
}

impl PairwiseTest {
    pub fn summary(&self) -> String {
        format!(
            "{} vs {}: p-value = {:.4}",
            self.first, self.second, self.result.p_value
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheapestMarket {
    pub market_type: MarketType,
    pub mean_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplementaryAnalysis {
    pub min_year_exclusive: i32,
    pub ranking_size: usize,
    /// Mean price per market type, sorted by market type.
    pub market_means: Vec<Ranked>,
    /// Total price per month, one series per year.
    pub monthly_totals: Vec<Series>,
    pub highest_countries: Vec<Ranked>,
    pub lowest_countries: Vec<Ranked>,
    pub tests: Vec<PairwiseTest>,
    pub cheapest: Option<CheapestMarket>,
}

fn prices_for(rows: &[&PriceRecord], market: MarketType) -> Vec<Option<f64>> {
    rows.iter()
        .filter(|r| r.market_type.as_deref() == Some(market.label()))
        .map(|r| r.price)
        .collect()
}

impl SupplementaryAnalysis {
    pub fn compute(table: &PriceTable, settings: &AnalysisSettings) -> Self {
        let cutoff = settings.min_year_exclusive;
        let rows: Vec<&PriceRecord> = table
            .records
            .iter()
            .filter(|r| r.year.is_some_and(|y| y > cutoff))
            .collect();
        debug!(rows = rows.len(), cutoff, "supplementary analysis");

        let market_means: Vec<Ranked> =
            aggregate::mean_by(rows.iter().copied(), Field::MarketType)
                .into_iter()
                .filter_map(|s| {
                    s.value.map(|value| Ranked {
                        label: s.key,
                        value,
                    })
                })
                .collect();

        let totals = aggregate::sum_by_year_month(rows.iter().copied());
        let mut monthly_totals: Vec<Series> = Vec::new();
        for stat in totals {
            let (year, month) = stat.key;
            let point = Point {
                x: f64::from(month),
                y: stat.value.unwrap_or(0.0),
            };
            let name = year.to_string();
            match monthly_totals.last_mut() {
                Some(series) if series.name == name => series.points.push(point),
                _ => monthly_totals.push(Series::new(name, vec![point])),
            }
        }

        let country_means = aggregate::mean_by(rows.iter().copied(), Field::Country);
        let highest_countries = aggregate::largest(country_means.clone(), settings.ranking_size);
        let lowest_countries = aggregate::smallest(country_means, settings.ranking_size);

        let samples: Vec<(MarketType, Vec<Option<f64>>)> = MarketType::ALL
            .into_iter()
            .map(|m| (m, prices_for(&rows, m)))
            .collect();
        let sample = |m: MarketType| {
            samples
                .iter()
                .find(|(k, _)| *k == m)
                .map(|(_, v)| v.as_slice())
                .unwrap_or(&[])
        };

        let tests = MarketType::pairs()
            .into_iter()
            .map(|(first, second)| PairwiseTest {
                first,
                second,
                result: stats::two_sample_t_test(sample(first), sample(second)),
            })
            .collect();

        let cheapest = lowest_mean(MarketType::ALL.into_iter().map(|m| (m, sample(m))));

        Self {
            min_year_exclusive: cutoff,
            ranking_size: settings.ranking_size,
            market_means,
            monthly_totals,
            highest_countries,
            lowest_countries,
            tests,
            cheapest,
        }
    }

    pub fn cheapest_summary(&self) -> String {
        match &self.cheapest {
            Some(c) => format!(
                "Market type offering the lowest average price: {} with mean price {:.2}",
                c.market_type, c.mean_price
            ),
            None => format!(
                "Market type offering the lowest average price: no prices recorded after {}",
                self.min_year_exclusive
            ),
        }
    }

    pub fn append_to(&self, report: &mut Report) {
        let title = "Comparison of Average Prices by Market Type";
        report.heading(title);
        report.chart(ChartSpec::Bar(
            BarChart::new(title, "Market Type", "Average Price", Orientation::Vertical).with_bars(
                self.market_means
                    .iter()
                    .map(|r| (r.label.clone(), r.value)),
            ),
        ));

        let title = "Total Monthly Price Over the Years";
        report.heading(title);
        let chart = self
            .monthly_totals
            .iter()
            .cloned()
            .fold(LineChart::new(title, "Month", "Price").with_legend(), |c, s| {
                c.with_series(s)
            });
        report.chart(ChartSpec::Line(chart));

        for (title, ranking) in [
            (
                format!(
                    "Top {} Countries with Highest Average Food Prices",
                    self.ranking_size
                ),
                &self.highest_countries,
            ),
            (
                format!(
                    "Top {} Countries with Lowest Average Food Prices",
                    self.ranking_size
                ),
                &self.lowest_countries,
            ),
        ] {
            report.heading(title.clone());
            report.chart(ChartSpec::Bar(
                BarChart::new(title, "Country", "Average Price", Orientation::Vertical)
                    .with_bars(ranking.iter().map(|r| (r.label.clone(), r.value))),
            ));
        }

        report.heading("Price Differences Between Market Types (T-Test p-values)");
        for test in &self.tests {
            report.text(test.summary());
        }
        report.text(self.cheapest_summary());

        report.heading("Impact of Price Changes on Quantity Demanded");
        report.chart(ChartSpec::Line(demand_curves()));
    }
}

/// The market type with the lowest mean price. Types without any valid price
/// are skipped; the first minimum wins on ties.
pub fn lowest_mean<'a, I>(samples: I) -> Option<CheapestMarket>
where
    I: IntoIterator<Item = (MarketType, &'a [Option<f64>])>,
{
    samples
        .into_iter()
        .filter_map(|(market_type, prices)| {
            stats::mean_present(prices).map(|mean_price| CheapestMarket {
                market_type,
                mean_price,
            })
        })
        .fold(None, |best: Option<CheapestMarket>, c| match best {
            Some(b) if b.mean_price <= c.mean_price => Some(b),
            _ => Some(c),
        })
}

pub fn elastic_demand(price: f64) -> f64 {
    10.0 - 2.0 * price
}

pub fn inelastic_demand(price: f64) -> f64 {
    6.0 - price
}

/// Illustrative demand curves over prices 0..=10.
pub fn demand_curves() -> LineChart {
    let curve = |name: &str, f: fn(f64) -> f64| {
        Series::new(
            name,
            (0..=10)
                .map(|p| {
                    let x = f64::from(p);
                    Point { x, y: f(x) }
                })
                .collect(),
        )
    };
    LineChart::new(
        "Impact of Price Changes on Quantity Demanded",
        "Price",
        "Quantity Demanded",
    )
    .with_series(curve("Elastic Demand", elastic_demand))
    .with_series(curve("Inelastic Demand", inelastic_demand))
    .with_legend()
}
