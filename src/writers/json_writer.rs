use crate::error::Result;
use crate::models::DashboardReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write_report(&self, report: &DashboardReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, report)?;
        } else {
            serde_json::to_writer(&mut writer, report)?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, StationAggregate};
    use tempfile::TempDir;

    #[test]
    fn test_report_round_trips_through_json() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("report.json");
        let report = DashboardReport {
            top_stations: vec![StationAggregate::new("A", 2)],
            conditions: vec![Condition::MissingColumn {
                column: "start_station_name".to_string(),
            }],
            ..Default::default()
        };

        JsonWriter::new().with_pretty(false).write_report(&report, &path)?;

        let loaded: DashboardReport = serde_json::from_reader(File::open(&path)?)?;
        assert_eq!(loaded, report);
        Ok(())
    }
}
