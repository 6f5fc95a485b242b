// Configuration loading and parsing (matchup.toml).

use crate::compare::{Comparator, DegeneratePolicy};
use crate::schema::{CategorySchema, Outcome};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub date_column: String,
    pub sum_targets: Vec<String>,
    pub eff_targets: Vec<String>,
    pub degenerate: DegeneratePolicy,
}

impl Config {
    pub fn schema(&self) -> CategorySchema {
        CategorySchema::new(&self.sum_targets, &self.eff_targets)
    }

    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.degenerate)
    }
}

// ---------------------------------------------------------------------------
// matchup.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire matchup.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    table: TableSection,
    categories: CategoriesSection,
    #[serde(default)]
    comparison: ComparisonSection,
}

#[derive(Debug, Clone, Deserialize)]
struct TableSection {
    #[serde(default = "default_date_column")]
    date_column: String,
}

impl Default for TableSection {
    fn default() -> Self {
        TableSection {
            date_column: default_date_column(),
        }
    }
}

fn default_date_column() -> String {
    "date".into()
}

#[derive(Debug, Clone, Deserialize)]
struct CategoriesSection {
    #[serde(default)]
    sum: Vec<String>,
    #[serde(default)]
    efficiency: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ComparisonSection {
    #[serde(default)]
    degenerate: DegeneratePolicy,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate a matchup config file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    parse_with_origin(&text, path)
}

/// Parse and validate config text that did not come from a file.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    parse_with_origin(text, Path::new("<inline>"))
}

fn parse_with_origin(text: &str, origin: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: origin.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        date_column: file.table.date_column.trim().to_string(),
        sum_targets: file.categories.sum,
        eff_targets: file.categories.efficiency,
        degenerate: file.comparison.degenerate,
    };

    validate(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.date_column.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "table.date_column".into(),
            message: "must not be empty".into(),
        });
    }

    if config.sum_targets.is_empty() && config.eff_targets.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "categories".into(),
            message: "at least one sum or efficiency category is required".into(),
        });
    }

    let mut names = HashSet::new();
    let targets = config
        .sum_targets
        .iter()
        .map(|t| ("categories.sum", t))
        .chain(config.eff_targets.iter().map(|t| ("categories.efficiency", t)));
    for (field, name) in targets {
        if name.trim().is_empty() || name.trim() != name {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: format!("category name {name:?} must be non-empty with no surrounding whitespace"),
            });
        }
        if !names.insert(name.as_str()) {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: format!("duplicate category `{name}`"),
            });
        }
    }

    // Categories may share a column (counting `fta` next to efficiency
    // `ft`), but none may read the date key as a number.
    let schema = config.schema();
    for outcome in [Outcome::Predicted, Outcome::Actual] {
        if let Some(column) = schema
            .required_columns(outcome)
            .into_iter()
            .find(|column| *column == config.date_column)
        {
            return Err(ConfigError::ValidationError {
                field: "categories".into(),
                message: format!("column `{column}` is the date column"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
