use chrono::{Datelike, Local};
use std::path::PathBuf;

fn date_stamp() -> String {
    let now = Local::now();
    format!("{:02}{:02}{:02}", now.year() % 100, now.month(), now.day())
}

/// Station ranking export, named after the file the dashboards read: `top{N}_station.csv`
pub fn default_stations_output(top_n: usize) -> PathBuf {
    PathBuf::from("output").join(format!("top{}_station.csv", top_n))
}

/// Daily series export: bike-rides-daily-{YYMMDD}.csv
pub fn default_daily_output() -> PathBuf {
    PathBuf::from("output").join(format!("bike-rides-daily-{}.csv", date_stamp()))
}

/// Full report export: dashboard-report-{YYMMDD}.json
pub fn default_report_output() -> PathBuf {
    PathBuf::from("output").join(format!("dashboard-report-{}.json", date_stamp()))
}
