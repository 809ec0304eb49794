use crate::config::{ColumnAliases, PipelineConfig};
use crate::models::{normalize_header, NormalizationStats, RawTable, TripRecord, TripTable};
use crate::utils::constants::TIMESTAMP_FORMATS;
use crate::utils::timestamps::parse_timestamp;
use tracing::{debug, info};

/// Turns raw trip rows with inconsistent column naming into [`TripRecord`]s.
///
/// The first alias present in the table wins, so the alias lists double as
/// the precedence policy between e.g. `started_at` and `start_time`.
pub struct TripNormalizer {
    aliases: ColumnAliases,
    timestamp_formats: Vec<String>,
}

impl TripNormalizer {
    pub fn new() -> Self {
        Self {
            aliases: ColumnAliases::default(),
            timestamp_formats: TIMESTAMP_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            aliases: config.columns.clone(),
            timestamp_formats: config.timestamp_formats.clone(),
        }
    }

    pub fn with_aliases(mut self, aliases: ColumnAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn normalize(&self, table: &RawTable) -> TripTable {
        let timestamp = resolve_column(table, &self.aliases.start_time);
        let station = resolve_column(table, &self.aliases.station_name);

        let mut stats = NormalizationStats {
            total_rows: table.len(),
            skipped_rows: table.skipped_rows,
            ..Default::default()
        };

        if timestamp.is_none() {
            stats.missing_columns.push(self.aliases.start_time.join("|"));
        }
        if station.is_none() {
            stats.missing_columns.push(self.aliases.station_name.join("|"));
        }

        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let start_time = match &timestamp {
                Some((idx, _)) => match table.cell(row, *idx).map(str::trim) {
                    Some(value) if !value.is_empty() => {
                        let parsed = parse_timestamp(value, &self.timestamp_formats);
                        if parsed.is_none() {
                            stats.unparseable_timestamps += 1;
                        }
                        parsed
                    }
                    _ => {
                        stats.missing_timestamps += 1;
                        None
                    }
                },
                None => {
                    stats.missing_timestamps += 1;
                    None
                }
            };

            let start_station_name = station
                .as_ref()
                .and_then(|(idx, _)| table.cell(row, *idx))
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string);

            if start_station_name.is_none() {
                stats.missing_station_names += 1;
            }

            records.push(TripRecord::new(start_time, start_station_name));
        }

        if stats.unparseable_timestamps > 0 {
            info!(
                "{} of {} trips have unparseable start times",
                stats.unparseable_timestamps, stats.total_rows
            );
        }
        debug!(
            timestamp_column = ?timestamp.as_ref().map(|(_, name)| name),
            station_column = ?station.as_ref().map(|(_, name)| name),
            rows = records.len(),
            "Normalized trip table"
        );

        TripTable {
            records,
            timestamp_column: timestamp.map(|(_, name)| name),
            station_column: station.map(|(_, name)| name),
            stats,
        }
    }
}

impl Default for TripNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// First alias present in the table, with its index and normalized name.
fn resolve_column(table: &RawTable, aliases: &[String]) -> Option<(usize, String)> {
    aliases.iter().find_map(|alias| {
        table
            .column_index(alias)
            .map(|idx| (idx, normalize_header(alias)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Season;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_mixed_case_headers() {
        let raw = RawTable::from_str_rows(
            &[" Started_At ", "START_STATION_NAME"],
            &[vec!["2022-04-01 08:00", "A"], vec!["2022-12-24 17:30", "B"]],
        );

        let table = TripNormalizer::new().normalize(&raw);

        assert_eq!(table.timestamp_column.as_deref(), Some("started_at"));
        assert_eq!(table.station_column.as_deref(), Some("start_station_name"));
        assert_eq!(table.records[0].date, Some(date(2022, 4, 1)));
        assert_eq!(table.records[0].season, Some(Season::Spring));
        assert_eq!(table.records[1].month, Some(12));
        assert_eq!(table.records[1].season, Some(Season::Winter));
    }

    #[test]
    fn test_started_at_takes_precedence_by_default() {
        let raw = RawTable::from_str_rows(
            &["start_time", "started_at", "start_station_name"],
            &[vec!["2021-01-01 00:00", "2022-07-01 00:00", "A"]],
        );

        let table = TripNormalizer::new().normalize(&raw);
        assert_eq!(table.records[0].date, Some(date(2022, 7, 1)));
    }

    #[test]
    fn test_precedence_is_configurable() {
        let raw = RawTable::from_str_rows(
            &["start_time", "started_at", "start_station_name"],
            &[vec!["2021-01-01 00:00", "2022-07-01 00:00", "A"]],
        );
        let aliases = ColumnAliases {
            start_time: vec!["start_time".to_string(), "started_at".to_string()],
            ..ColumnAliases::default()
        };

        let table = TripNormalizer::new().with_aliases(aliases).normalize(&raw);
        assert_eq!(table.timestamp_column.as_deref(), Some("start_time"));
        assert_eq!(table.records[0].date, Some(date(2021, 1, 1)));
    }

    #[test]
    fn test_unparseable_timestamp_nulls_the_row_only() {
        let raw = RawTable::from_str_rows(
            &["start_time", "start_station_name"],
            &[vec!["not-a-date", "A"], vec!["2022-04-02 08:00", "B"], vec!["", "C"]],
        );

        let table = TripNormalizer::new().normalize(&raw);

        assert_eq!(table.len(), 3);
        assert_eq!(table.records[0].start_time, None);
        assert_eq!(table.records[0].date, None);
        assert_eq!(table.records[0].start_station_name.as_deref(), Some("A"));
        assert_eq!(table.stats.unparseable_timestamps, 1);
        assert_eq!(table.stats.missing_timestamps, 1);
        assert_eq!(table.stats.dated_rows(), 1);
    }

    #[test]
    fn test_missing_timestamp_column() {
        let raw = RawTable::from_str_rows(&["start_station_name"], &[vec!["A"], vec!["B"]]);

        let table = TripNormalizer::new().normalize(&raw);

        assert!(!table.has_timestamp_column());
        assert!(table.records.iter().all(|r| r.start_time.is_none()));
        assert_eq!(table.stats.missing_columns, vec!["started_at|start_time"]);
    }

    #[test]
    fn test_missing_station_column_is_reported() {
        let raw = RawTable::from_str_rows(&["started_at"], &[vec!["2022-04-01 08:00"]]);

        let table = TripNormalizer::new().normalize(&raw);

        assert!(!table.has_station_column());
        assert!(table.require_station_column().is_err());
        assert_eq!(table.records[0].date, Some(date(2022, 4, 1)));
    }

    #[test]
    fn test_blank_station_names_are_null() {
        let raw = RawTable::from_str_rows(
            &["started_at", "start_station_name"],
            &[vec!["2022-04-01 08:00", "  "], vec!["2022-04-01 08:00"]],
        );

        let table = TripNormalizer::new().normalize(&raw);

        assert!(table.records.iter().all(|r| r.start_station_name.is_none()));
        assert_eq!(table.stats.missing_station_names, 2);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = RawTable::from_str_rows(
            &["Started_At", "Start_Station_Name", "rideable_type"],
            &[
                vec!["2022-04-01 08:00:12.345", "A", "classic_bike"],
                vec!["not-a-date", "B", "electric_bike"],
                vec!["2022-11-30 23:59", "", "classic_bike"],
            ],
        );
        let normalizer = TripNormalizer::new();

        let once = normalizer.normalize(&raw);
        let twice = normalizer.normalize(&once.to_raw_table());

        assert_eq!(once.records, twice.records);
        assert_eq!(once.station_column, twice.station_column);
        assert!(twice.has_timestamp_column());
    }

    #[test]
    fn test_normalize_is_idempotent_with_configured_aliases() {
        let raw = RawTable::from_str_rows(
            &["tripduration", "starttime", "Start Station Name"],
            &[
                vec!["695", "2016-07-01 08:00:00", "W 21 St & 6 Ave"],
                vec!["412", "7/1/2016 09:15:00", "Broadway & W 60 St"],
            ],
        );
        let aliases = ColumnAliases {
            start_time: vec!["starttime".to_string()],
            station_name: vec!["start station name".to_string()],
            ..ColumnAliases::default()
        };
        let normalizer = TripNormalizer::new().with_aliases(aliases);

        let once = normalizer.normalize(&raw);
        let twice = normalizer.normalize(&once.to_raw_table());

        assert_eq!(
            once.records[0].start_time,
            date(2016, 7, 1).and_hms_opt(8, 0, 0)
        );
        assert_eq!(
            once.records[1].start_station_name.as_deref(),
            Some("Broadway & W 60 St")
        );
        assert_eq!(once.records, twice.records);
        assert_eq!(twice.timestamp_column.as_deref(), Some("starttime"));
        assert_eq!(twice.station_column.as_deref(), Some("start station name"));
    }
}
