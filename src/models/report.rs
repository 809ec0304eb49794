use serde::{Deserialize, Serialize};

use crate::models::{
    JoinedSeries, NormalizationStats, SeasonAggregate, StationAggregate, TripSummary,
};

/// A non-fatal problem found while building a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    MissingColumn { column: String },
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::MissingColumn { column } => {
                write!(f, "The column '{}' is missing from the dataset", column)
            }
        }
    }
}

/// Everything the dashboard pages draw from one trip file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub summary: TripSummary,
    pub top_stations: Vec<StationAggregate>,
    pub daily: JoinedSeries,
    pub seasons: Vec<SeasonAggregate>,
    pub stats: NormalizationStats,
    pub conditions: Vec<Condition>,
    pub weather_joined: bool,
}

impl DashboardReport {
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn detailed_summary(&self) -> String {
        let mut summary = self.summary.summary();

        summary.push_str(&format!("\nTop {} Start Stations:\n", self.top_stations.len()));
        for (i, station) in self.top_stations.iter().enumerate() {
            summary.push_str(&format!(
                "  {:>2}. {} ({} trips)\n",
                i + 1,
                station.station_name,
                station.trip_count
            ));
        }

        summary.push_str(&format!("\nDays With Rides: {}\n", self.daily.len()));
        if self.weather_joined {
            summary.push_str(&format!(
                "Days With Temperature: {}\n",
                self.daily.days_with_temperature()
            ));
        }

        if !self.seasons.is_empty() {
            summary.push_str("\nTrips By Season:\n");
            for season in &self.seasons {
                summary.push_str(&format!("  {}: {}\n", season.season, season.trip_count));
            }
        }

        if self.has_conditions() {
            summary.push_str("\nWarnings:\n");
            for condition in &self.conditions {
                summary.push_str(&format!("  - {}\n", condition));
            }
        }

        summary
    }
}
