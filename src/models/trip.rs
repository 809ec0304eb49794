use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Fixed calendar mapping: Dec-Feb winter, Mar-May spring, Jun-Aug summer, Sep-Nov fall.
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "winter" => Some(Season::Winter),
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" | "autumn" => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One bicycle rental event. The calendar fields are always derived from
/// `start_time`, so a record without a timestamp has no date, month or season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub start_time: Option<NaiveDateTime>,
    pub start_station_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub month: Option<u32>,
    pub season: Option<Season>,
}

impl TripRecord {
    pub fn new(start_time: Option<NaiveDateTime>, start_station_name: Option<String>) -> Self {
        let date = start_time.map(|t| t.date());
        let month = start_time.map(|t| t.month());
        let season = month.and_then(Season::from_month);

        Self {
            start_time,
            start_station_name,
            date,
            month,
            season,
        }
    }

    pub fn has_station(&self) -> bool {
        self.start_station_name.is_some()
    }

    pub fn has_timestamp(&self) -> bool {
        self.start_time.is_some()
    }
}
