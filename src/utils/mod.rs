pub mod constants;
pub mod filename;
pub mod progress;
pub mod timestamps;

pub use constants::*;
pub use filename::{default_daily_output, default_report_output, default_stations_output};
pub use progress::ProgressReporter;
pub use timestamps::{parse_date, parse_timestamp};
