//! Dataset loading: CSV via Polars with index artifact removal and numeric coercion.
//!
//! Every cell is read as text (schema inference disabled) and coerced here, so
//! a malformed `year` or `month` becomes a missing value instead of failing
//! the whole read.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::record::{Dataset, Field, PriceRecord, PriceTable};

/// Header pandas writes for an unnamed index column.
pub const INDEX_ARTIFACT: &str = "Unnamed: 0";

/// Errors from reading the source files. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: column '{column}' is not text: {source}")]
    ColumnType {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },
}

/// Locations of the two source tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub base: PathBuf,
    pub extended: PathBuf,
}

impl DatasetPaths {
    pub fn new(base: impl Into<PathBuf>, extended: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            extended: extended.into(),
        }
    }
}

/// Load both tables.
pub fn load_dataset(paths: &DatasetPaths) -> Result<Dataset, LoadError> {
    let base = load_table("base", &paths.base)?;
    let extended = load_table("extended", &paths.extended)?;
    Ok(Dataset::new(base, extended))
}

/// Load one CSV file into a [`PriceTable`].
pub fn load_table(name: &str, path: &Path) -> Result<PriceTable, LoadError> {
    let csv_err = |source: PolarsError| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_err)?
        .finish()
        .map_err(csv_err)?;

    let df = drop_index_artifact(df).map_err(csv_err)?;
    let table = dataframe_to_table(name, path, &df)?;

    info!(
        table = name,
        path = %path.display(),
        rows = table.len(),
        columns = ?table.columns,
        "loaded price table"
    );
    Ok(table)
}

/// Drop the index column left behind by a previous `to_csv` round trip.
///
/// Pandas names it `Unnamed: 0`; when the header cell is simply empty, Polars
/// names the first column `column_1` (or leaves it blank).
fn drop_index_artifact(df: DataFrame) -> PolarsResult<DataFrame> {
    let first = df
        .get_column_names()
        .first()
        .map(|name| name.as_str().to_string());

    let artifact = match first.as_deref() {
        Some(name) if name == INDEX_ARTIFACT || name.is_empty() || name == "column_1" => {
            Some(name.to_string())
        }
        _ if df.column(INDEX_ARTIFACT).is_ok() => Some(INDEX_ARTIFACT.to_string()),
        _ => None,
    };

    match artifact {
        Some(name) => {
            debug!(column = %name, "dropping index artifact column");
            df.drop(&name)
        }
        None => Ok(df),
    }
}

fn dataframe_to_table(name: &str, path: &Path, df: &DataFrame) -> Result<PriceTable, LoadError> {
    let mut columns = Vec::new();
    let mut cells: Vec<(Field, Vec<Option<String>>)> = Vec::new();

    for column in df.get_columns() {
        let header = column.name().as_str();
        let Some(field) = Field::from_column_name(header.trim()) else {
            debug!(table = name, column = header, "ignoring non-domain column");
            continue;
        };
        let text = column.str().map_err(|source| LoadError::ColumnType {
            path: path.to_path_buf(),
            column: header.to_string(),
            source,
        })?;
        columns.push(field);
        cells.push((field, text.into_iter().map(|v| v.map(str::to_owned)).collect()));
    }

    if !columns.contains(&Field::Price) {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: Field::Price.column_name().to_string(),
        });
    }

    let mut records = vec![PriceRecord::default(); df.height()];
    for (field, values) in cells {
        let mut rejected = 0usize;
        for (record, value) in records.iter_mut().zip(values) {
            if !assign(record, field, value) {
                rejected += 1;
            }
        }
        if rejected > 0 {
            warn!(
                table = name,
                column = field.column_name(),
                rejected,
                "non-numeric values coerced to missing"
            );
        }
    }

    Ok(PriceTable::new(name, columns, records))
}

/// Store a raw cell on the record. Returns false when a non-empty numeric cell
/// could not be parsed (it is stored as missing).
fn assign(record: &mut PriceRecord, field: Field, raw: Option<String>) -> bool {
    let raw = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let present = raw.is_some();
    match field {
        Field::Year => {
            record.year = raw.as_deref().and_then(parse_integral);
            !present || record.year.is_some()
        }
        Field::Month => {
            record.month = raw.as_deref().and_then(parse_integral);
            !present || record.month.is_some()
        }
        Field::Price => {
            record.price = raw.as_deref().and_then(parse_numeric);
            !present || record.price.is_some()
        }
        Field::MarketType => {
            record.market_type = raw;
            true
        }
        Field::Country => {
            record.country = raw;
            true
        }
        Field::Produce => {
            record.produce = raw;
            true
        }
    }
}

/// Lenient numeric parse: unparseable text and NaN are missing.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Numeric parse that additionally requires an integral value in `i32` range
/// (`"2019"` and `"2019.0"` are accepted, `"2019.5"` is not).
pub fn parse_integral(raw: &str) -> Option<i32> {
    let value = parse_numeric(raw)?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

/// Load-once holder for the dataset pair.
///
/// The first [`DatasetCache::get_or_load`] reads both files; every later call
/// hands back the same `Arc` without touching the filesystem.
#[derive(Debug)]
pub struct DatasetCache {
    paths: DatasetPaths,
    cell: OnceLock<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(paths: DatasetPaths) -> Self {
        Self {
            paths,
            cell: OnceLock::new(),
        }
    }

    pub fn paths(&self) -> &DatasetPaths {
        &self.paths
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get_or_load(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }
        let loaded = Arc::new(load_dataset(&self.paths)?);
        Ok(Arc::clone(self.cell.get_or_init(|| loaded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_parse_is_lenient() {
        assert_eq!(parse_numeric(" 12.5 "), Some(12.5));
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("nan"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn integral_parse_rejects_fractions() {
        assert_eq!(parse_integral("2019"), Some(2019));
        assert_eq!(parse_integral("2019.0"), Some(2019));
        assert_eq!(parse_integral("2019.5"), None);
        assert_eq!(parse_integral("20x9"), None);
        assert_eq!(parse_integral("1e12"), None);
    }

    #[test]
    fn assign_reports_rejected_numeric_cells() {
        let mut r = PriceRecord::default();
        assert!(!assign(&mut r, Field::Year, Some("n/a".into())));
        assert_eq!(r.year, None);
        assert!(assign(&mut r, Field::Year, None));
        assert!(assign(&mut r, Field::Year, Some("  ".into())));
        assert!(assign(&mut r, Field::Month, Some("7".into())));
        assert_eq!(r.month, Some(7));
        assert!(assign(&mut r, Field::Country, Some(" Kenya ".into())));
        assert_eq!(r.country.as_deref(), Some("Kenya"));
    }

    #[test]
    fn index_artifact_is_dropped() {
        let df = df!(
            INDEX_ARTIFACT => &["0", "1"],
            "price" => &["1.0", "2.0"],
        )
        .unwrap();
        let df = drop_index_artifact(df).unwrap();
        assert_eq!(df.width(), 1);
        assert!(df.column(INDEX_ARTIFACT).is_err());
    }

    #[test]
    fn frame_without_artifact_is_untouched() {
        let df = df!(
            "year" => &["2019"],
            "price" => &["1.0"],
        )
        .unwrap();
        let df = drop_index_artifact(df).unwrap();
        assert_eq!(df.width(), 2);
    }
}
