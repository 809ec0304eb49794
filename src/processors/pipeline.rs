use crate::config::{MissingColumnPolicy, PipelineConfig};
use crate::error::{ProcessingError, Result};
use crate::models::{Condition, DailyWeather, DashboardReport, StationAggregate, TripTable};
use crate::processors::{LoadCache, SeriesJoiner, TripAggregator, TripNormalizer};
use crate::readers::{TripReader, WeatherReader};
use crate::utils::constants::COL_START_TIME;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Load, normalize, aggregate and join one trip file into a [`DashboardReport`].
pub struct DashboardPipeline {
    config: PipelineConfig,
    normalizer: TripNormalizer,
    aggregator: TripAggregator,
    joiner: SeriesJoiner,
    cache: Option<LoadCache<TripTable>>,
}

impl DashboardPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            normalizer: TripNormalizer::from_config(&config),
            aggregator: TripAggregator::with_top_n(config.top_n),
            joiner: SeriesJoiner::new(),
            cache: None,
            config,
        }
    }

    pub fn with_cache(mut self, cache: LoadCache<TripTable>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&LoadCache<TripTable>> {
        self.cache.as_ref()
    }

    /// Read and normalize a trip file, through the cache when one is set.
    pub fn load_trips(&mut self, path: &Path) -> Result<Arc<TripTable>> {
        let reader = TripReader::with_mmap(self.config.use_mmap)
            .with_delimiter(self.config.delimiter_byte());
        let normalizer = &self.normalizer;
        let load = |p: &Path| -> Result<TripTable> {
            let raw = reader.read_table(p)?;
            Ok(normalizer.normalize(&raw))
        };

        match self.cache.as_mut() {
            Some(cache) => cache.get_or_load(path, load),
            None => load(path).map(Arc::new),
        }
    }

    pub fn load_weather(&self, path: &Path) -> Result<Vec<DailyWeather>> {
        WeatherReader::new()
            .with_temperature_aliases(self.config.columns.weather_temperature.clone())
            .with_delimiter(self.config.delimiter_byte())
            .read_weather(path)
    }

    /// Station ranking with the configured missing-column policy applied.
    /// Under `warn` and `ignore` a missing station column yields an empty
    /// ranking plus a condition; under `error` it fails.
    pub fn station_ranking(
        &self,
        table: &TripTable,
    ) -> Result<(Vec<StationAggregate>, Option<Condition>)> {
        match self.aggregator.station_ranking(table) {
            Ok(ranking) => Ok((ranking, None)),
            Err(ProcessingError::MissingColumn { column }) => {
                match self.config.missing_station_policy {
                    MissingColumnPolicy::Error => Err(ProcessingError::MissingColumn { column }),
                    MissingColumnPolicy::Warn => {
                        warn!("The column '{}' is missing from the dataset", column);
                        Ok((Vec::new(), Some(Condition::MissingColumn { column })))
                    }
                    MissingColumnPolicy::Ignore => {
                        Ok((Vec::new(), Some(Condition::MissingColumn { column })))
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// The full dashboard report. The station ranking is part of it, so a
    /// missing station column is handled per `missing_station_policy`.
    pub fn build_report(
        &mut self,
        trips_path: &Path,
        weather_path: Option<&Path>,
        progress: Option<&ProgressReporter>,
    ) -> Result<DashboardReport> {
        self.build(trips_path, weather_path, progress, true)
    }

    /// The report without a station ranking. `top_stations` stays empty and
    /// the station column is neither required nor reported.
    pub fn build_daily_report(
        &mut self,
        trips_path: &Path,
        weather_path: Option<&Path>,
        progress: Option<&ProgressReporter>,
    ) -> Result<DashboardReport> {
        self.build(trips_path, weather_path, progress, false)
    }

    fn build(
        &mut self,
        trips_path: &Path,
        weather_path: Option<&Path>,
        progress: Option<&ProgressReporter>,
        rank_stations: bool,
    ) -> Result<DashboardReport> {
        // Check every whole-file input before doing any work
        for path in std::iter::once(trips_path).chain(weather_path) {
            if !path.is_file() {
                return Err(ProcessingError::MissingSource {
                    path: path.to_path_buf(),
                });
            }
        }

        if let Some(p) = progress {
            p.set_message("Reading trip data...");
        }
        let table = self.load_trips(trips_path)?;

        let mut conditions = Vec::new();
        let weather = match weather_path {
            Some(path) => {
                if let Some(p) = progress {
                    p.set_message("Reading weather data...");
                }
                match self.load_weather(path) {
                    Ok(weather) => Some(weather),
                    Err(ProcessingError::MissingColumn { column }) => {
                        warn!("Weather file {} has no '{}' column", path.display(), column);
                        conditions.push(Condition::MissingColumn { column });
                        Some(Vec::new())
                    }
                    Err(e) => return Err(e),
                }
            }
            None => None,
        };

        if let Some(p) = progress {
            p.set_message("Aggregating trips...");
        }

        let top_stations = if rank_stations {
            let (ranking, condition) = self.station_ranking(&table)?;
            conditions.extend(condition);
            ranking
        } else {
            Vec::new()
        };

        if !table.has_timestamp_column() {
            let column = self.config.columns.start_time.first().cloned();
            conditions.push(Condition::MissingColumn {
                column: column.unwrap_or_else(|| COL_START_TIME.to_string()),
            });
        }

        let daily_counts = self.aggregator.daily_trip_counts(&table.records);
        let daily = match &weather {
            Some(weather) => self.joiner.join(&daily_counts, weather),
            None => self.joiner.without_weather(&daily_counts),
        };

        let report = DashboardReport {
            summary: self.aggregator.summarize(&table),
            top_stations,
            daily,
            seasons: self.aggregator.season_trip_counts(&table.records),
            stats: table.stats.clone(),
            conditions,
            weather_joined: weather.is_some(),
        };

        if let Some(p) = progress {
            p.finish_with_message(&format!("Processed {} trips", report.summary.total_trips));
        }
        info!(
            trips = report.summary.total_trips,
            stations = report.summary.unique_stations,
            days = report.daily.len(),
            "Built dashboard report"
        );

        Ok(report)
    }
}

impl Default for DashboardPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_report_without_station_column_warns_and_continues() -> Result<()> {
        let trips = csv_file(&["started_at,ride_id", "2022-04-01 08:00,r1", "2022-04-02 08:00,r2"]);

        let mut pipeline = DashboardPipeline::default();
        let report = pipeline.build_report(trips.path(), None, None)?;

        assert!(report.top_stations.is_empty());
        assert_eq!(report.daily.len(), 2);
        assert_eq!(
            report.conditions,
            vec![Condition::MissingColumn {
                column: "start_station_name".to_string()
            }]
        );
        assert_eq!(report.summary.unique_stations, 0);
        Ok(())
    }

    #[test]
    fn test_error_policy_fails_on_missing_station_column() {
        let trips = csv_file(&["started_at", "2022-04-01 08:00"]);
        let config =
            PipelineConfig::default().with_missing_station_policy(MissingColumnPolicy::Error);

        let err = DashboardPipeline::new(config)
            .build_report(trips.path(), None, None)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MissingColumn { .. }));
    }

    #[test]
    fn test_daily_report_ignores_error_policy() -> Result<()> {
        let trips = csv_file(&["started_at", "2022-04-01 08:00", "2022-04-01 12:00"]);
        let config =
            PipelineConfig::default().with_missing_station_policy(MissingColumnPolicy::Error);

        let report = DashboardPipeline::new(config).build_daily_report(trips.path(), None, None)?;

        assert!(report.top_stations.is_empty());
        assert!(report.conditions.is_empty());
        assert_eq!(report.daily.total_trips(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_weather_file_halts_before_loading() {
        let trips = csv_file(&["started_at,start_station_name", "2022-04-01 08:00,A"]);
        let mut pipeline = DashboardPipeline::default().with_cache(LoadCache::new());

        let err = pipeline
            .build_report(trips.path(), Some(Path::new("no/such/weather.csv")), None)
            .unwrap_err();

        assert!(matches!(err, ProcessingError::MissingSource { .. }));
        // no trip table was read
        assert_eq!(pipeline.cache().map(|c| c.misses()), Some(0));
    }

    #[test]
    fn test_report_joins_weather() -> Result<()> {
        let trips = csv_file(&[
            "started_at,start_station_name",
            "2022-01-01 08:00,A",
            "2022-01-01 09:00,B",
            "2022-01-02 09:00,A",
        ]);
        let weather = csv_file(&["date,avgTemp", "2022-01-01,11.6"]);

        let mut pipeline = DashboardPipeline::default();
        let report = pipeline.build_report(trips.path(), Some(weather.path()), None)?;

        let day1 = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2022, 1, 2).unwrap();
        assert!(report.weather_joined);
        assert_eq!(report.daily.get(&day1).unwrap().trip_count, 2);
        assert_eq!(report.daily.get(&day1).unwrap().avg_temperature, Some(11.6));
        assert_eq!(report.daily.get(&day2).unwrap().avg_temperature, None);
        assert_eq!(report.top_stations[0], StationAggregate::new("A", 2));
        assert!(report.conditions.is_empty());
        Ok(())
    }

    #[test]
    fn test_cached_pipeline_reuses_table() -> Result<()> {
        let trips = csv_file(&["started_at,start_station_name", "2022-01-01 08:00,A"]);
        let mut pipeline = DashboardPipeline::default().with_cache(LoadCache::new());

        let first = pipeline.load_trips(trips.path())?;
        let second = pipeline.load_trips(trips.path())?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pipeline.cache().map(|c| c.hits()), Some(1));
        Ok(())
    }
}
