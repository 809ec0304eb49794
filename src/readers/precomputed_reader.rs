use crate::error::{ProcessingError, Result};
use crate::models::{normalize_header, JoinedDay, JoinedSeries, StationAggregate};
use crate::readers::TripReader;
use crate::utils::constants::DEFAULT_DELIMITER;
use crate::utils::timestamps::parse_date;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct StationRow {
    start_station_name: String,
    #[serde(alias = "trip_count", alias = "count")]
    value: f64,
}

#[derive(Debug, Deserialize)]
struct DailyRow {
    date: String,
    #[serde(alias = "bike_rides_daily")]
    trip_count: f64,
    #[serde(alias = "avgtemp", default, deserialize_with = "csv::invalid_option")]
    avg_temperature: Option<f64>,
}

/// Reads aggregates that were computed ahead of time, such as
/// `top20_station.csv` and `reduced_data_to_plot.csv`.
pub struct PrecomputedReader {
    delimiter: u8,
}

impl PrecomputedReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Station counts from a `start_station_name,value` table, in file order.
    pub fn read_station_counts(&self, path: &Path) -> Result<Vec<StationAggregate>> {
        let rows: Vec<StationRow> = self.read_rows(path)?;

        rows.into_iter()
            .map(|row| {
                Ok(StationAggregate::new(
                    row.start_station_name,
                    to_count(row.value)?,
                ))
            })
            .collect()
    }

    /// A daily series with `date`, `bike_rides_daily` or `trip_count`, and `avgTemp`.
    pub fn read_daily_series(&self, path: &Path) -> Result<JoinedSeries> {
        let rows: Vec<DailyRow> = self.read_rows(path)?;
        let mut series = JoinedSeries::new();

        for row in rows {
            let Some(date) = parse_date(&row.date) else {
                debug!("Skipping daily row with unparseable date '{}'", row.date);
                continue;
            };

            let day = JoinedDay {
                date,
                trip_count: to_count(row.trip_count)?,
                avg_temperature: row.avg_temperature.filter(|t| t.is_finite()),
            };

            if !series.insert_first(day) {
                warn!("Duplicate date {} in precomputed series; keeping the first", date);
            }
        }

        Ok(series)
    }

    /// Decode and split the file the same way trip files are read, then
    /// deserialize each row against the normalized headers. Rows that do not
    /// fit `T` are skipped with a warning.
    fn read_rows<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let table = TripReader::new()
            .with_delimiter(self.delimiter)
            .read_table(path)?;

        let headers: csv::StringRecord =
            table.headers.iter().map(|h| normalize_header(h)).collect();

        let mut rows = Vec::with_capacity(table.len());
        for (line, cells) in table.rows.iter().enumerate() {
            let record: csv::StringRecord = cells.iter().map(String::as_str).collect();
            match record.deserialize(Some(&headers)) {
                Ok(row) => rows.push(row),
                Err(e) => warn!("Skipping row {} of {}: {}", line + 2, path.display(), e),
            }
        }

        Ok(rows)
    }
}

impl Default for PrecomputedReader {
    fn default() -> Self {
        Self::new()
    }
}

fn to_count(value: f64) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(ProcessingError::InvalidFormat(format!(
            "Trip count must be a non-negative whole number, got {}",
            value
        )));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_top20_station_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "start_station_name,value")?;
        writeln!(temp_file, "W 21 St & 6 Ave,129")?;
        writeln!(temp_file, "West St & Chambers St,117.0")?;

        let stations = PrecomputedReader::new().read_station_counts(temp_file.path())?;

        assert_eq!(
            stations,
            vec![
                StationAggregate::new("W 21 St & 6 Ave", 129),
                StationAggregate::new("West St & Chambers St", 117),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_read_reduced_daily_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "date,bike_rides_daily,avgTemp")?;
        writeln!(temp_file, "2022-01-02,40,")?;
        writeln!(temp_file, "2022-01-01,20,11.6")?;

        let series = PrecomputedReader::new().read_daily_series(temp_file.path())?;
        let days: Vec<&JoinedDay> = series.iter().collect();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(days[0].trip_count, 20);
        assert_eq!(days[0].avg_temperature, Some(11.6));
        assert_eq!(days[1].avg_temperature, None);
        Ok(())
    }

    #[test]
    fn test_read_trip_count_variant() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "Date, Trip_Count ,avgTemp")?;
        writeln!(temp_file, "2022-01-01 00:00:00,5,3.25")?;

        let series = PrecomputedReader::new().read_daily_series(temp_file.path())?;
        let day = series
            .get(&NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
            .unwrap();

        assert_eq!(day.trip_count, 5);
        assert_eq!(day.avg_temperature, Some(3.25));
        Ok(())
    }

    #[test]
    fn test_configured_delimiter_and_bom() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"\xEF\xBB\xBFstart_station_name;value\n")?;
        temp_file.write_all(b"Grove St PATH;42\n")?;
        temp_file.write_all(b"Caf\xE9 Corner;7\n")?;

        let stations = PrecomputedReader::new()
            .with_delimiter(b';')
            .read_station_counts(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0], StationAggregate::new("Grove St PATH", 42));
        assert_eq!(stations[1].station_name, "Caf\u{FFFD} Corner");
        assert_eq!(stations[1].trip_count, 7);
        Ok(())
    }

    #[test]
    fn test_fractional_count_is_rejected() {
        assert!(to_count(12.5).is_err());
        assert!(to_count(-1.0).is_err());
        assert_eq!(to_count(12.0).unwrap(), 12);
    }
}
