//! Dashboard configuration, read from TOML.
//!
//! Every field has a default, so a missing file or a partial one is fine:
//!
//! ```toml
//! [data]
//! base_path = "Bri1.csv"
//! extended_path = "NewBri.csv"
//!
//! [analysis]
//! min_year_exclusive = 2010
//! ranking_size = 10
//! preview_rows = 100
//! preview_seed = 7
//!
//! [logging]
//! level = "info"
//! file = "foodtrend.log"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::DatasetPaths;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub analysis: AnalysisSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub base_path: PathBuf,
    pub extended_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("Bri1.csv"),
            extended_path: PathBuf::from("NewBri.csv"),
        }
    }
}

/// Knobs for the views that are fixed constants in the original dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// The supplementary block keeps rows with `year > min_year_exclusive`.
    pub min_year_exclusive: i32,
    /// Size of the highest / lowest country rankings.
    pub ranking_size: usize,
    /// Rows sampled for the data preview.
    pub preview_rows: usize,
    /// Fixed seed for the preview sample; random when unset.
    pub preview_seed: Option<u64>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_year_exclusive: 2010,
            ranking_size: 10,
            preview_rows: 100,
            preview_seed: None,
        }
    }
}

impl AnalysisSettings {
    /// Pick a fresh preview seed so the next render draws a new sample.
    pub fn reseed_preview(&mut self) {
        self.preview_seed = Some(rand::random());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file used by the terminal dashboard.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("foodtrend.log"),
        }
    }
}

impl DashboardConfig {
    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths::new(&self.data.base_path, &self.data.extended_path)
    }

    /// Replace the data paths with any command-line overrides.
    pub fn with_overrides(mut self, base: Option<PathBuf>, extended: Option<PathBuf>) -> Self {
        if let Some(base) = base {
            self.data.base_path = base;
        }
        if let Some(extended) = extended {
            self.data.extended_path = extended;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.data.base_path, PathBuf::from("Bri1.csv"));
        assert_eq!(cfg.data.extended_path, PathBuf::from("NewBri.csv"));
        assert_eq!(cfg.analysis.min_year_exclusive, 2010);
        assert_eq!(cfg.analysis.ranking_size, 10);
        assert_eq!(cfg.analysis.preview_rows, 100);
        assert!(cfg.analysis.preview_seed.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
            [analysis]
            ranking_size = 5
            preview_seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.ranking_size, 5);
        assert_eq!(cfg.analysis.preview_seed, Some(42));
        assert_eq!(cfg.analysis.min_year_exclusive, 2010);
        assert_eq!(cfg.data, DataConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = DashboardConfig::load(Path::new("/nonexistent/foodtrend.toml")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis\nranking_size = ").unwrap();
        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn reseed_sets_a_seed() {
        let mut settings = AnalysisSettings::default();
        settings.reseed_preview();
        assert!(settings.preview_seed.is_some());
    }

    #[test]
    fn overrides_replace_paths() {
        let cfg = DashboardConfig::default()
            .with_overrides(Some(PathBuf::from("a.csv")), None);
        assert_eq!(cfg.data.base_path, PathBuf::from("a.csv"));
        assert_eq!(cfg.data.extended_path, PathBuf::from("NewBri.csv"));
        assert_eq!(cfg.dataset_paths().base, PathBuf::from("a.csv"));
    }
}
