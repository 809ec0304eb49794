use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Season;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationAggregate {
    pub station_name: String,
    pub trip_count: usize,
}

impl StationAggregate {
    pub fn new(station_name: impl Into<String>, trip_count: usize) -> Self {
        Self {
            station_name: station_name.into(),
            trip_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub trip_count: usize,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate, trip_count: usize) -> Self {
        Self { date, trip_count }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonAggregate {
    pub season: Season,
    pub trip_count: usize,
}

/// Headline figures for a loaded trip table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    pub total_trips: usize,
    pub unique_stations: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl TripSummary {
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.first_date.zip(self.last_date)
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Trip Summary ===\n");
        summary.push_str(&format!("Total Trips: {}\n", self.total_trips));
        summary.push_str(&format!("Unique Start Stations: {}\n", self.unique_stations));
        if let Some((first, last)) = self.date_range() {
            summary.push_str(&format!("Date Range: {} to {}\n", first, last));
        }

        summary
    }
}
