use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub avg_temperature: Option<f64>,
}

impl DailyWeather {
    pub fn new(date: NaiveDate, avg_temperature: Option<f64>) -> Self {
        Self {
            date,
            avg_temperature,
        }
    }
}

/// One day of ride counts with the temperature observed that day, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoinedDay {
    pub date: NaiveDate,
    pub trip_count: usize,
    pub avg_temperature: Option<f64>,
}

/// Daily series keyed by date, iterated in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinedSeries {
    days: BTreeMap<NaiveDate, JoinedDay>,
}

impl JoinedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a day unless the date is already present. Returns whether it was inserted.
    pub fn insert_first(&mut self, day: JoinedDay) -> bool {
        match self.days.entry(day.date) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(day);
                true
            }
        }
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&JoinedDay> {
        self.days.get(date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JoinedDay> {
        self.days.values()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    pub fn total_trips(&self) -> usize {
        self.days.values().map(|d| d.trip_count).sum()
    }

    pub fn days_with_temperature(&self) -> usize {
        self.days
            .values()
            .filter(|d| d.avg_temperature.is_some())
            .count()
    }
}

impl FromIterator<JoinedDay> for JoinedSeries {
    fn from_iter<I: IntoIterator<Item = JoinedDay>>(iter: I) -> Self {
        let mut series = JoinedSeries::new();
        for day in iter {
            series.insert_first(day);
        }
        series
    }
}
