//! FoodTrend CLI: headless access to the dashboard views.
//!
//! Commands:
//! - `views`: list the available views
//! - `options`: list the values a picker offers
//! - `report`: render one view and print it as text, JSON, or CSV

mod output;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use foodtrend_core::config::DashboardConfig;
use foodtrend_core::loader::load_dataset;
use foodtrend_core::record::Dataset;
use foodtrend_core::view::{picker_options, render_view, PickerField, ViewKind, ViewRequest};

use crate::output::Format;

#[derive(Parser)]
#[command(
    name = "foodtrend",
    about = "African food price views from the command line"
)]
struct Cli {
    /// Path to the TOML config.
    #[arg(long, global = true, default_value = "foodtrend.toml")]
    config: PathBuf,

    /// Override the base table path (Bri1.csv).
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Override the extended table path (NewBri.csv).
    #[arg(long, global = true)]
    extended: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the views in sidebar order.
    Views,
    /// List the distinct values a picker offers.
    Options {
        field: FieldArg,

        /// Restrict countries to those that have this produce.
        #[arg(long)]
        produce: Option<String>,
    },
    /// Render a view and print its report.
    Report {
        /// View label or slug, e.g. "Price Trend by Item" or price-trend-by-item.
        view: ViewKind,

        /// Produce to select (repeatable).
        #[arg(long)]
        produce: Vec<String>,

        /// Market type to select (repeatable).
        #[arg(long = "market-type")]
        market_type: Vec<String>,

        /// Country to select (repeatable).
        #[arg(long)]
        country: Vec<String>,

        /// Start from the view's default selections.
        #[arg(long, default_value_t = false)]
        defaults: bool,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FieldArg {
    Produce,
    MarketType,
    Country,
}

impl From<FieldArg> for PickerField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Produce => PickerField::Produce,
            FieldArg::MarketType => PickerField::MarketType,
            FieldArg::Country => PickerField::Country,
        }
    }
}

/// Explicit picker values from the command line.
#[derive(Debug, Default)]
struct Selections {
    produce: Vec<String>,
    market_types: Vec<String>,
    countries: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?
        .with_overrides(cli.base, cli.extended);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Views => {
            for view in ViewKind::ALL {
                writeln!(out, "{}\t{}", view.slug(), view.label())?;
            }
        }
        Commands::Options { field, produce } => {
            let dataset = load(&config)?;
            let request = options_request(field, produce);
            for value in picker_options(&dataset, &request, field.into()) {
                writeln!(out, "{value}")?;
            }
        }
        Commands::Report {
            view,
            produce,
            market_type,
            country,
            defaults,
            format,
        } => {
            let dataset = load(&config)?;
            let selections = Selections {
                produce,
                market_types: market_type,
                countries: country,
            };
            let request = build_request(view, &dataset, selections, defaults);
            info!(?request, "rendering");
            let report = render_view(&dataset, &request, &config.analysis);
            output::write_report(&mut out, &report, format)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn load(config: &DashboardConfig) -> Result<Dataset> {
    let paths = config.dataset_paths();
    load_dataset(&paths).with_context(|| {
        format!(
            "loading {} and {}",
            paths.base.display(),
            paths.extended.display()
        )
    })
}

/// A request whose picker options match what `options` should list.
fn options_request(field: FieldArg, produce: Option<String>) -> ViewRequest {
    match (field, produce) {
        (FieldArg::Country, Some(produce)) => ViewRequest::ComparisonByCountry {
            produce: Some(produce),
            countries: Vec::new(),
        },
        _ => ViewRequest::empty(ViewKind::PriceTrendsByProduce),
    }
}

/// Start from the view's defaults (or nothing) and apply explicit flags.
/// Produce goes first so a country comparison resets its countries before
/// explicit countries are applied.
fn build_request(
    view: ViewKind,
    dataset: &Dataset,
    selections: Selections,
    defaults: bool,
) -> ViewRequest {
    let mut request = if defaults {
        ViewRequest::default_for(view, dataset)
    } else {
        ViewRequest::empty(view)
    };
    let pickers = view.pickers();
    for (field, values) in [
        (PickerField::Produce, selections.produce),
        (PickerField::MarketType, selections.market_types),
        (PickerField::Country, selections.countries),
    ] {
        if values.is_empty() {
            continue;
        }
        if !pickers.iter().any(|p| p.field == field) {
            warn!(%view, ?field, "view has no such picker; values ignored");
            continue;
        }
        let known = picker_options(dataset, &request, field);
        for value in values.iter().filter(|v| !known.contains(v)) {
            warn!(%view, ?field, value = %value, "value not present in the data");
        }
        request.apply_selection(dataset, field, values);
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use foodtrend_core::record::{Field, PriceRecord, PriceTable};

    fn dataset() -> Dataset {
        let row = |country: &str, produce: &str| PriceRecord {
            year: Some(2015),
            month: Some(1),
            market_type: Some("Retail".into()),
            country: Some(country.into()),
            produce: Some(produce.into()),
            price: Some(1.0),
        };
        let table = PriceTable::new(
            "t",
            Field::ALL.to_vec(),
            vec![row("Kenya", "Maize"), row("Benin", "Rice"), row("Ghana", "Rice")],
        );
        Dataset::new(table.clone(), table)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn view_argument_accepts_slug_and_label() {
        let cli = Cli::try_parse_from(["foodtrend", "report", "average-price-by-item"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Report { view: ViewKind::AveragePriceByItem, .. }
        ));
        let cli = Cli::try_parse_from([
            "foodtrend",
            "report",
            "Price Trend by Item",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Report { view: ViewKind::PriceTrendByItem, format: Format::Json, .. }
        ));
        assert!(Cli::try_parse_from(["foodtrend", "report", "pie-chart"]).is_err());
    }

    #[test]
    fn explicit_flags_without_defaults() {
        let ds = dataset();
        let request = build_request(
            ViewKind::PriceTrendByCountry,
            &ds,
            Selections {
                countries: vec!["Ghana".into()],
                ..Default::default()
            },
            false,
        );
        assert_eq!(
            request,
            ViewRequest::PriceTrendByCountry {
                countries: vec!["Ghana".into()]
            }
        );
    }

    #[test]
    fn produce_flag_resets_default_countries() {
        let ds = dataset();
        let request = build_request(
            ViewKind::ComparisonByCountry,
            &ds,
            Selections {
                produce: vec!["Rice".into()],
                ..Default::default()
            },
            true,
        );
        assert_eq!(
            request,
            ViewRequest::ComparisonByCountry {
                produce: Some("Rice".into()),
                countries: vec!["Benin".into(), "Ghana".into()],
            }
        );
    }

    #[test]
    fn flags_for_missing_pickers_are_ignored() {
        let ds = dataset();
        let request = build_request(
            ViewKind::AveragePriceByCountry,
            &ds,
            Selections {
                produce: vec!["Maize".into()],
                ..Default::default()
            },
            false,
        );
        assert_eq!(request, ViewRequest::AveragePriceByCountry);
    }

    #[test]
    fn country_options_can_be_restricted() {
        let ds = dataset();
        let request = options_request(FieldArg::Country, Some("Rice".into()));
        assert_eq!(
            picker_options(&ds, &request, PickerField::Country),
            vec!["Benin", "Ghana"]
        );
        let request = options_request(FieldArg::Country, None);
        assert_eq!(picker_options(&ds, &request, PickerField::Country).len(), 3);
    }
}
