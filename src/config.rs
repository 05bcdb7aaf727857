//! Experiment configuration, persisted as TOML.
//!
//! ```toml
//! [dataset]
//! skip_columns = 3
//! has_header = true
//!
//! [split]
//! train_ratio = 0.8
//! seed = 42
//!
//! [model]
//! alpha = 1.0
//!
//! [classify]
//! substitute_urls = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{DEFAULT_SKIP_COLUMNS, DEFAULT_TRAIN_RATIO, DatasetOptions};
use crate::error::{ConfigError, ConfigResult};
use crate::model::DEFAULT_ALPHA;
use crate::normalize::NormalizeOptions;

/// Full experiment configuration. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
    pub dataset: DatasetSection,
    pub split: SplitSection,
    pub model: ModelSection,
    pub classify: ClassifySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    /// Leading metadata columns to drop from each CSV row.
    pub skip_columns: usize,
    /// Whether the CSV starts with a header row.
    pub has_header: bool,
}

impl Default for DatasetSection {
    fn default() -> Self {
        Self {
            skip_columns: DEFAULT_SKIP_COLUMNS,
            has_header: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSection {
    /// Fraction of shuffled rows used for training.
    pub train_ratio: f64,
    /// Shuffle seed. Absent means OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SplitSection {
    fn default() -> Self {
        Self {
            train_ratio: DEFAULT_TRAIN_RATIO,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Laplace smoothing strength.
    pub alpha: f64,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifySection {
    /// Replace URLs with `link` when normalizing text to classify.
    pub substitute_urls: bool,
}

impl Default for ClassifySection {
    fn default() -> Self {
        Self {
            substitute_urls: true,
        }
    }
}

impl SieveConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        let ratio = self.split.train_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::Invalid {
                message: format!("split.train_ratio must be in (0, 1], got {ratio}"),
            });
        }
        let alpha = self.model.alpha;
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ConfigError::Invalid {
                message: format!("model.alpha must be finite and > 0, got {alpha}"),
            });
        }
        Ok(())
    }

    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions {
            skip_columns: self.dataset.skip_columns,
            has_header: self.dataset.has_header,
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            substitute_urls: self.classify.substitute_urls,
        }
    }
}
