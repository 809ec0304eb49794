use crate::models::{DailyAggregate, DailyWeather, JoinedDay, JoinedSeries};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Left-joins daily trip counts against a daily temperature series.
pub struct SeriesJoiner;

impl SeriesJoiner {
    pub fn new() -> Self {
        Self
    }

    /// One row per date in `daily_counts`. Days without weather keep their
    /// trip count and get no temperature; weather-only days are dropped.
    /// For repeated dates the first occurrence on each side is used.
    pub fn join(&self, daily_counts: &[DailyAggregate], weather: &[DailyWeather]) -> JoinedSeries {
        let mut temperatures: HashMap<NaiveDate, Option<f64>> =
            HashMap::with_capacity(weather.len());
        for day in weather {
            if temperatures.contains_key(&day.date) {
                warn!("Duplicate weather date {}; keeping the first value", day.date);
                continue;
            }
            temperatures.insert(day.date, day.avg_temperature);
        }

        let mut series = JoinedSeries::new();
        for count in daily_counts {
            let joined = JoinedDay {
                date: count.date,
                trip_count: count.trip_count,
                avg_temperature: temperatures.get(&count.date).copied().flatten(),
            };
            if !series.insert_first(joined) {
                warn!("Duplicate trip count date {}; keeping the first value", count.date);
            }
        }

        let unmatched = series.len() - series.days_with_temperature();
        if unmatched > 0 {
            debug!("{} of {} days have no temperature", unmatched, series.len());
        }

        series
    }

    /// Daily counts with no weather at all.
    pub fn without_weather(&self, daily_counts: &[DailyAggregate]) -> JoinedSeries {
        self.join(daily_counts, &[])
    }
}

impl Default for SeriesJoiner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, d).unwrap()
    }

    #[test]
    fn test_join_against_empty_weather() {
        let counts = vec![DailyAggregate::new(date(1), 5)];

        let series = SeriesJoiner::new().join(&counts, &[]);

        assert_eq!(series.len(), 1);
        assert_eq!(
            series.get(&date(1)),
            Some(&JoinedDay {
                date: date(1),
                trip_count: 5,
                avg_temperature: None
            })
        );
    }

    #[test]
    fn test_join_is_total_on_the_left() {
        let counts = vec![
            DailyAggregate::new(date(1), 5),
            DailyAggregate::new(date(2), 7),
            DailyAggregate::new(date(3), 2),
        ];
        let weather = vec![
            DailyWeather::new(date(2), Some(4.5)),
            DailyWeather::new(date(9), Some(1.0)),
            DailyWeather::new(date(3), None),
        ];

        let series = SeriesJoiner::new().join(&counts, &weather);

        assert_eq!(series.len(), 3);
        assert_eq!(series.get(&date(1)).unwrap().avg_temperature, None);
        assert_eq!(series.get(&date(2)).unwrap().avg_temperature, Some(4.5));
        assert_eq!(series.get(&date(3)).unwrap().avg_temperature, None);
        assert!(series.get(&date(9)).is_none());
        assert_eq!(series.total_trips(), 14);
    }

    #[test]
    fn test_duplicate_weather_keeps_first() {
        let counts = vec![DailyAggregate::new(date(1), 1)];
        let weather = vec![
            DailyWeather::new(date(1), Some(2.0)),
            DailyWeather::new(date(1), Some(30.0)),
        ];

        let series = SeriesJoiner::new().join(&counts, &weather);
        assert_eq!(series.get(&date(1)).unwrap().avg_temperature, Some(2.0));
    }
}
