/// Canonical trip column names
pub const COL_STARTED_AT: &str = "started_at";
pub const COL_START_TIME: &str = "start_time";
pub const COL_START_STATION_NAME: &str = "start_station_name";
pub const COL_DATE: &str = "date";
pub const COL_MONTH: &str = "month";
pub const COL_SEASON: &str = "season";

/// Precomputed aggregate column names
pub const COL_VALUE: &str = "value";
pub const COL_TRIP_COUNT: &str = "trip_count";
pub const COL_BIKE_RIDES_DAILY: &str = "bike_rides_daily";
pub const COL_AVG_TEMP: &str = "avgTemp";

/// Weather temperature column aliases, compared after lower-casing
pub const WEATHER_TEMPERATURE_ALIASES: &[&str] =
    &["avgtemp", "avg_temperature", "tavg", "temperature"];

/// Timestamp formats tried in order. RFC 3339 and bare dates are handled separately.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Processing defaults
pub const DEFAULT_TOP_N: usize = 20;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_DELIMITER: u8 = b',';

/// Configuration
pub const CONFIG_ENV_PREFIX: &str = "BIKESHARE";
