use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, TrendsError};

/// Read from the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "hp-trends.toml";

const DEFAULT_EXCLUDED_ATHLETES: [&str; 14] = [
    "Zack Jones",
    "Dylan Gargas",
    "Logan Kniss",
    "Alexander Combs",
    "Dan Swain",
    "Shio Enomoto",
    "Jackson Sigman",
    "Cade Johnson",
    "Brice Crider",
    "Connor White",
    "Brett Cook",
    "Abigayle Darula",
    "Conner Watson",
    "Tyler Kozlowski",
];

/// Run configuration for both report pipelines.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source table, optionally schema-qualified (`hp_data.hp_tests`).
    pub table: String,
    /// Athlete names removed from the improvement report (exact match).
    pub excluded_athletes: Vec<String>,
    pub cohort: CohortConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CohortConfig {
    pub lower_mph: f64,
    pub upper_mph: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub improvement_chart: String,
    pub radar_chart: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: "hp_tests".to_string(),
            excluded_athletes: DEFAULT_EXCLUDED_ATHLETES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            cohort: CohortConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            lower_mph: 90.0,
            upper_mph: 95.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            improvement_chart: "improvement.svg".to_string(),
            radar_chart: "radar.svg".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load an explicitly requested file, which must exist. Without one, use
    /// [`DEFAULT_CONFIG_FILE`] when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.is_file() => Err(TrendsError::Validation(format!(
                "config file {} does not exist",
                path.display()
            ))),
            Some(path) => Self::from_file(path),
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "No configuration file found; using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.table)?;

        let CohortConfig {
            lower_mph,
            upper_mph,
        } = self.cohort;
        if !lower_mph.is_finite() || !upper_mph.is_finite() {
            return Err(TrendsError::Validation(
                "cohort thresholds must be finite".to_string(),
            ));
        }
        if upper_mph < lower_mph {
            return Err(TrendsError::Validation(format!(
                "cohort.upper_mph ({upper_mph}) must be >= cohort.lower_mph ({lower_mph})"
            )));
        }
        Ok(())
    }

    pub fn improvement_chart_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.improvement_chart)
    }

    pub fn radar_chart_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.radar_chart)
    }
}

fn validate_table_name(table: &str) -> Result<()> {
    let parts: Vec<&str> = table.split('.').collect();
    let valid = parts.len() <= 2
        && parts.iter().all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(TrendsError::Validation(format!(
            "table '{table}' must be an identifier or schema.identifier"
        )))
    }
}
