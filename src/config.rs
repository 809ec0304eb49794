//! Pipeline configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `BIKESHARE_*` environment variables (nested keys use `__`, lists use `,`).

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    COL_STARTED_AT, COL_START_STATION_NAME, COL_START_TIME, CONFIG_ENV_PREFIX, DEFAULT_DELIMITER,
    DEFAULT_TOP_N, TIMESTAMP_FORMATS, WEATHER_TEMPERATURE_ALIASES,
};

/// What to do when a trip table has no station column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumnPolicy {
    /// Log a warning and report the condition; the station ranking is empty.
    #[default]
    Warn,
    /// Report the condition without logging; the station ranking is empty.
    Ignore,
    /// Fail the run.
    Error,
}

/// Recognized source column names, in precedence order. Compared after
/// lower-casing and trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ColumnAliases {
    #[validate(length(min = 1))]
    pub start_time: Vec<String>,

    #[validate(length(min = 1))]
    pub station_name: Vec<String>,

    #[validate(length(min = 1))]
    pub weather_temperature: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            start_time: vec![COL_STARTED_AT.to_string(), COL_START_TIME.to_string()],
            station_name: vec![COL_START_STATION_NAME.to_string()],
            weather_temperature: WEATHER_TEMPERATURE_ALIASES
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(nested)]
    pub columns: ColumnAliases,

    #[validate(range(min = 1))]
    pub top_n: usize,

    pub missing_station_policy: MissingColumnPolicy,

    #[validate(length(min = 1))]
    pub timestamp_formats: Vec<String>,

    pub delimiter: char,

    pub use_mmap: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnAliases::default(),
            top_n: DEFAULT_TOP_N,
            missing_station_policy: MissingColumnPolicy::default(),
            timestamp_formats: TIMESTAMP_FORMATS.iter().map(|f| f.to_string()).collect(),
            delimiter: DEFAULT_DELIMITER as char,
            use_mmap: false,
        }
    }
}

impl PipelineConfig {
    pub fn load_from_path(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(ProcessingError::MissingSource {
                    path: path.to_path_buf(),
                });
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("columns.start_time")
                .with_list_parse_key("columns.station_name")
                .with_list_parse_key("columns.weather_temperature")
                .with_list_parse_key("timestamp_formats"),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.check()?;

        Ok(config)
    }

    /// Run field validation plus the checks the derive cannot express.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if !self.delimiter.is_ascii() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }

        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        // check() guarantees ASCII
        self.delimiter as u8
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_missing_station_policy(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing_station_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();

        assert!(config.check().is_ok());
        assert_eq!(config.top_n, 20);
        assert_eq!(config.columns.start_time, vec!["started_at", "start_time"]);
        assert_eq!(config.missing_station_policy, MissingColumnPolicy::Warn);
        assert_eq!(config.delimiter_byte(), b',');
    }

    #[test]
    fn test_zero_top_n_is_rejected() {
        let config = PipelineConfig::default().with_top_n(0);
        assert!(matches!(
            config.check(),
            Err(ProcessingError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_alias_list_is_rejected() {
        let mut config = PipelineConfig::default();
        config.columns.start_time.clear();
        assert!(config.check().is_err());
    }

    #[test]
    fn test_load_from_toml_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "top_n = 5")?;
        writeln!(file, "missing_station_policy = \"ignore\"")?;
        writeln!(file, "[columns]")?;
        writeln!(file, "start_time = [\"start_time\", \"started_at\"]")?;

        let config = PipelineConfig::load_from_path(Some(file.path()))?;

        assert_eq!(config.top_n, 5);
        assert_eq!(config.missing_station_policy, MissingColumnPolicy::Ignore);
        assert_eq!(config.columns.start_time, vec!["start_time", "started_at"]);
        // untouched sections keep their defaults
        assert_eq!(config.columns.station_name, vec!["start_station_name"]);
        Ok(())
    }

    #[test]
    fn test_missing_config_file_is_missing_source() {
        let err =
            PipelineConfig::load_from_path(Some(Path::new("no/such/config.toml"))).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingSource { .. }));
    }
}
