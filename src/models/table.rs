use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::TripRecord;
use crate::utils::constants::{
    COL_DATE, COL_MONTH, COL_SEASON, COL_START_STATION_NAME, TIMESTAMP_OUTPUT_FORMAT,
};

/// Lower-case and trim a column name.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A CSV table exactly as read: original header spelling, string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows the reader could not parse and dropped.
    pub skipped_rows: usize,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            skipped_rows: 0,
        }
    }

    pub fn from_str_rows(headers: &[&str], rows: &[Vec<&str>]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, compared after header normalization on both sides.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers
            .iter()
            .position(|h| normalize_header(h) == wanted)
    }

    /// Cell value, `None` for rows shorter than the header.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub total_rows: usize,
    pub skipped_rows: usize,
    pub missing_timestamps: usize,
    pub unparseable_timestamps: usize,
    pub missing_station_names: usize,
    pub missing_columns: Vec<String>,
}

impl NormalizationStats {
    pub fn dated_rows(&self) -> usize {
        self.total_rows - self.missing_timestamps - self.unparseable_timestamps
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Normalization Report ===\n");
        summary.push_str(&format!("Total Rows: {}\n", self.total_rows));
        summary.push_str(&format!("Skipped Rows: {}\n", self.skipped_rows));
        summary.push_str(&format!(
            "Missing Timestamps: {}\n",
            self.missing_timestamps
        ));
        summary.push_str(&format!(
            "Unparseable Timestamps: {}\n",
            self.unparseable_timestamps
        ));
        summary.push_str(&format!(
            "Missing Station Names: {}\n",
            self.missing_station_names
        ));

        if !self.missing_columns.is_empty() {
            summary.push_str(&format!(
                "Missing Columns: {}\n",
                self.missing_columns.join(", ")
            ));
        }

        summary
    }
}

/// Normalized trip records together with the columns they were taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTable {
    pub records: Vec<TripRecord>,
    pub timestamp_column: Option<String>,
    pub station_column: Option<String>,
    pub stats: NormalizationStats,
}

impl TripTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_station_column(&self) -> bool {
        self.station_column.is_some()
    }

    pub fn has_timestamp_column(&self) -> bool {
        self.timestamp_column.is_some()
    }

    pub fn require_station_column(&self) -> Result<&str> {
        self.station_column
            .as_deref()
            .ok_or_else(|| ProcessingError::missing_column(COL_START_STATION_NAME))
    }

    /// Write the records back out under the column names they were read
    /// from, followed by the derived calendar columns. Columns that were
    /// absent from the source stay absent.
    pub fn to_raw_table(&self) -> RawTable {
        let mut headers = Vec::new();
        if let Some(name) = &self.timestamp_column {
            headers.push(name.clone());
        }
        if let Some(name) = &self.station_column {
            headers.push(name.clone());
        }
        if self.has_timestamp_column() {
            headers.push(COL_DATE.to_string());
            headers.push(COL_MONTH.to_string());
            headers.push(COL_SEASON.to_string());
        }

        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut row = Vec::with_capacity(headers.len());
                if self.has_timestamp_column() {
                    row.push(
                        record
                            .start_time
                            .map(|t| t.format(TIMESTAMP_OUTPUT_FORMAT).to_string())
                            .unwrap_or_default(),
                    );
                }
                if self.has_station_column() {
                    row.push(record.start_station_name.clone().unwrap_or_default());
                }
                if self.has_timestamp_column() {
                    row.push(record.date.map(|d| d.to_string()).unwrap_or_default());
                    row.push(record.month.map(|m| m.to_string()).unwrap_or_default());
                    row.push(record.season.map(|s| s.to_string()).unwrap_or_default());
                }
                row
            })
            .collect();

        RawTable::new(headers, rows)
    }
}
