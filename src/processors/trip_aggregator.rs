use crate::error::Result;
use crate::models::{
    DailyAggregate, Season, SeasonAggregate, StationAggregate, TripRecord, TripSummary, TripTable,
};
use crate::utils::constants::DEFAULT_TOP_N;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Counting aggregates over normalized trips. Every record contributes one trip.
pub struct TripAggregator {
    top_n: usize,
}

impl TripAggregator {
    pub fn new() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// The `n` stations with the most trips, highest first. Records without a
    /// station name are ignored. Equal counts keep the order in which the
    /// stations first appear in `records`.
    pub fn top_stations_by_trips(&self, records: &[TripRecord], n: usize) -> Vec<StationAggregate> {
        // name -> (trip count, first position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

        for record in records {
            if let Some(name) = record.start_station_name.as_deref() {
                let next = counts.len();
                counts.entry(name).or_insert((0, next)).0 += 1;
            }
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(name, (count, first))| (name, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
        ranked.truncate(n);

        ranked
            .into_iter()
            .map(|(name, count, _)| StationAggregate::new(name, count))
            .collect()
    }

    /// Top stations using the configured `n`.
    pub fn top_stations(&self, records: &[TripRecord]) -> Vec<StationAggregate> {
        self.top_stations_by_trips(records, self.top_n)
    }

    /// Top stations for a table, or `MissingColumn` if it has no station column.
    pub fn station_ranking(&self, table: &TripTable) -> Result<Vec<StationAggregate>> {
        table.require_station_column()?;
        Ok(self.top_stations(&table.records))
    }

    /// Trips per calendar date in ascending date order; undated records are skipped.
    pub fn daily_trip_counts(&self, records: &[TripRecord]) -> Vec<DailyAggregate> {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();

        for date in records.iter().filter_map(|r| r.date) {
            *counts.entry(date).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(date, count)| DailyAggregate::new(date, count))
            .collect()
    }

    /// Trips per season in Winter, Spring, Summer, Fall order, omitting empty seasons.
    pub fn season_trip_counts(&self, records: &[TripRecord]) -> Vec<SeasonAggregate> {
        let mut counts: BTreeMap<Season, usize> = BTreeMap::new();

        for season in records.iter().filter_map(|r| r.season) {
            *counts.entry(season).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(season, trip_count)| SeasonAggregate { season, trip_count })
            .collect()
    }

    pub fn summarize(&self, table: &TripTable) -> TripSummary {
        let unique_stations = if table.has_station_column() {
            let mut names: Vec<&str> = table
                .records
                .iter()
                .filter_map(|r| r.start_station_name.as_deref())
                .collect();
            names.sort_unstable();
            names.dedup();
            names.len()
        } else {
            0
        };

        let dates = table.records.iter().filter_map(|r| r.date);

        TripSummary {
            total_trips: table.len(),
            unique_stations,
            first_date: dates.clone().min(),
            last_date: dates.max(),
        }
    }
}

impl Default for TripAggregator {
    fn default() -> Self {
        Self::new()
    }
}
