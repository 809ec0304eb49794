use crate::error::Result;
use crate::models::{JoinedSeries, StationAggregate};
use crate::utils::constants::{
    COL_AVG_TEMP, COL_BIKE_RIDES_DAILY, COL_DATE, COL_START_STATION_NAME, COL_VALUE,
    DEFAULT_DELIMITER,
};
use std::fs::File;
use std::path::Path;

/// Writes aggregates in the column layout the dashboards consume, so the
/// output can be read back with [`crate::readers::PrecomputedReader`].
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// `start_station_name,value`
    pub fn write_stations(&self, stations: &[StationAggregate], path: &Path) -> Result<()> {
        let mut writer = self.create(path)?;
        writer.write_record([COL_START_STATION_NAME, COL_VALUE])?;

        for station in stations {
            let count = station.trip_count.to_string();
            writer.write_record([station.station_name.as_str(), count.as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// `date,bike_rides_daily,avgTemp`; days without a temperature get an empty cell.
    pub fn write_daily(&self, series: &JoinedSeries, path: &Path) -> Result<()> {
        let mut writer = self.create(path)?;
        writer.write_record([COL_DATE, COL_BIKE_RIDES_DAILY, COL_AVG_TEMP])?;

        for day in series.iter() {
            writer.write_record([
                day.date.to_string(),
                day.trip_count.to_string(),
                day.avg_temperature.map(|t| t.to_string()).unwrap_or_default(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn get_file_info(&self, path: &Path) -> Result<OutputFileInfo> {
        let metadata = std::fs::metadata(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)?;

        Ok(OutputFileInfo {
            total_rows: reader.records().count(),
            file_size: metadata.len(),
        })
    }

    fn create(&self, path: &Path) -> Result<csv::Writer<File>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)?)
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct OutputFileInfo {
    pub total_rows: usize,
    pub file_size: u64,
}

impl OutputFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Output File Summary:\n\
            - Total rows: {}\n\
            - File size: {:.2} KB",
            self.total_rows,
            self.file_size as f64 / 1024.0
        )
    }
}
