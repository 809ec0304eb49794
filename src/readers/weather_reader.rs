use crate::error::{ProcessingError, Result};
use crate::models::{DailyWeather, RawTable};
use crate::readers::TripReader;
use crate::utils::constants::{COL_DATE, DEFAULT_DELIMITER, WEATHER_TEMPERATURE_ALIASES};
use crate::utils::timestamps::parse_date;
use std::path::Path;
use tracing::debug;

/// Reads a daily temperature series (`date` plus an average temperature column).
pub struct WeatherReader {
    temperature_aliases: Vec<String>,
    delimiter: u8,
}

impl WeatherReader {
    pub fn new() -> Self {
        Self {
            temperature_aliases: WEATHER_TEMPERATURE_ALIASES
                .iter()
                .map(|a| a.to_string())
                .collect(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_temperature_aliases(mut self, aliases: Vec<String>) -> Self {
        self.temperature_aliases = aliases;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read_weather(&self, path: &Path) -> Result<Vec<DailyWeather>> {
        let table = TripReader::new()
            .with_delimiter(self.delimiter)
            .read_table(path)?;
        self.parse_table(&table)
    }

    /// Rows with an unparseable date are dropped; an unparseable or empty
    /// temperature becomes `None`.
    pub fn parse_table(&self, table: &RawTable) -> Result<Vec<DailyWeather>> {
        let date_idx = table
            .column_index(COL_DATE)
            .ok_or_else(|| ProcessingError::missing_column(COL_DATE))?;

        let temp_idx = self
            .temperature_aliases
            .iter()
            .find_map(|alias| table.column_index(alias))
            .ok_or_else(|| {
                ProcessingError::missing_column(
                    self.temperature_aliases
                        .first()
                        .map(String::as_str)
                        .unwrap_or("avgtemp"),
                )
            })?;

        let mut weather = Vec::with_capacity(table.len());
        let mut bad_dates = 0;

        for row in 0..table.len() {
            let Some(date) = table.cell(row, date_idx).and_then(parse_date) else {
                bad_dates += 1;
                continue;
            };

            let avg_temperature = table.cell(row, temp_idx).and_then(parse_temperature);
            weather.push(DailyWeather::new(date, avg_temperature));
        }

        if bad_dates > 0 {
            debug!("Dropped {} weather rows with unparseable dates", bad_dates);
        }

        Ok(weather)
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_temperature(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
}
