//! FoodTrend Core: price tables, aggregation, statistics, and the views that
//! turn them into reports.
//!
//! - Record and table types for the two food-price CSV files
//! - CSV loading with lenient numeric coercion and a load-once cache
//! - Group-by means and sums, rankings, shared axis ranges
//! - Two-sample t-test for the market-type comparison
//! - The closed set of dashboard views and their renderers

pub mod aggregate;
pub mod config;
pub mod loader;
pub mod record;
pub mod report;
pub mod stats;
pub mod supplementary;
pub mod view;

pub use config::{AnalysisSettings, ConfigError, DashboardConfig};
pub use loader::{load_dataset, DatasetCache, DatasetPaths, LoadError};
pub use record::{Dataset, Field, PriceRecord, PriceTable};
pub use report::{Block, ChartSpec, Report};
pub use view::{picker_options, render_view, PickerField, PickerMode, ViewKind, ViewRequest};
