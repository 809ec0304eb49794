use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bikeshare-processor")]
#[command(about = "Bike-share trip aggregation: station rankings, daily rides and temperature")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Pipeline configuration file (TOML)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank start stations by number of trips
    Stations {
        #[arg(short, long, help = "Input trip CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Number of stations to keep [default: from config, 20]")]
        top: Option<usize>,

        #[arg(short, long, help = "Write the ranking as CSV to this path")]
        output: Option<PathBuf>,

        #[arg(long, help = "Write the ranking to output/top{N}_station.csv")]
        save: bool,
    },

    /// Count rides per day, optionally joined with daily average temperature
    Daily {
        #[arg(short, long, help = "Input trip CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Daily weather CSV file (date, avgTemp)")]
        weather: Option<PathBuf>,

        #[arg(short, long, help = "Write the series as CSV to this path")]
        output: Option<PathBuf>,

        #[arg(long, help = "Write the series to output/bike-rides-daily-{YYMMDD}.csv")]
        save: bool,
    },

    /// Build the full dashboard report for a trip file
    Report {
        #[arg(short, long, help = "Input trip CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Daily weather CSV file (date, avgTemp)")]
        weather: Option<PathBuf>,

        #[arg(short, long, help = "Write the report as JSON to this path")]
        json: Option<PathBuf>,

        #[arg(long, help = "Write the report to output/dashboard-report-{YYMMDD}.json")]
        save: bool,
    },

    /// Display station and daily aggregates that were computed ahead of time
    Precomputed {
        #[arg(long, help = "Station counts CSV (start_station_name, value)")]
        stations: PathBuf,

        #[arg(long, help = "Daily series CSV (date, bike_rides_daily or trip_count, avgTemp)")]
        daily: PathBuf,
    },

    /// Copy a pre-rendered map document unchanged
    Map {
        #[arg(short, long, help = "Map HTML file")]
        input: PathBuf,

        #[arg(short, long, help = "Destination path [default: stdout]")]
        output: Option<PathBuf>,
    },
}
