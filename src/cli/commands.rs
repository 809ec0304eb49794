use crate::cli::args::{Cli, Commands};
use crate::config::{MissingColumnPolicy, PipelineConfig};
use crate::models::{Condition, JoinedSeries, MapDocument, StationAggregate, TripTable};
use crate::processors::DashboardPipeline;
use crate::readers::PrecomputedReader;
use crate::utils::filename::{default_daily_output, default_report_output, default_stations_output};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, JsonWriter};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load_from_path(cli.config.as_deref())
        .context("Failed to load pipeline configuration")?;

    match cli.command {
        Commands::Stations {
            input,
            top,
            output,
            save,
        } => {
            let config = match top {
                Some(n) => config.with_top_n(n),
                None => config,
            };
            config.check().context("Invalid --top value")?;
            let top_n = config.top_n;

            let mut pipeline = DashboardPipeline::new(config);
            let table = load_trips(&mut pipeline, &input)?;

            let (stations, condition) = pipeline.station_ranking(&table)?;
            if pipeline.config().missing_station_policy != MissingColumnPolicy::Ignore {
                if let Some(condition) = &condition {
                    print_conditions(std::slice::from_ref(condition));
                }
            }

            println!("Top {} Start Stations ({} trips):", top_n, table.len());
            print_stations(&stations);

            if let Some(path) = output_target(output, save, || default_stations_output(top_n)) {
                CsvWriter::new()
                    .write_stations(&stations, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("\nWrote {} stations to {}", stations.len(), path.display());
            }
        }

        Commands::Daily {
            input,
            weather,
            output,
            save,
        } => {
            let mut pipeline = DashboardPipeline::new(config);
            let progress = ProgressReporter::new_spinner("Processing trips...", false);

            let report = pipeline
                .build_daily_report(&input, weather.as_deref(), Some(&progress))
                .with_context(|| load_failure(&input))?;

            println!("Daily Rides ({} days):", report.daily.len());
            print_daily(&report.daily, report.weather_joined);
            print_conditions(&report.conditions);

            if let Some(path) = output_target(output, save, default_daily_output) {
                let writer = CsvWriter::new();
                writer
                    .write_daily(&report.daily, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("\n{}", writer.get_file_info(&path)?.summary());
            }
        }

        Commands::Report {
            input,
            weather,
            json,
            save,
        } => {
            let mut pipeline = DashboardPipeline::new(config);
            let progress = ProgressReporter::new_spinner("Building report...", false);

            let report = pipeline
                .build_report(&input, weather.as_deref(), Some(&progress))
                .with_context(|| load_failure(&input))?;

            println!("\n{}", report.detailed_summary());
            println!("{}", report.stats.summary());

            if let Some(path) = output_target(json, save, default_report_output) {
                JsonWriter::new()
                    .write_report(&report, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Report written to {}", path.display());
            }
        }

        Commands::Precomputed { stations, daily } => {
            let reader = PrecomputedReader::new().with_delimiter(config.delimiter_byte());
            let stations = reader
                .read_station_counts(&stations)
                .with_context(|| format!("Could not load {}", stations.display()))?;
            let daily = reader
                .read_daily_series(&daily)
                .with_context(|| format!("Could not load {}", daily.display()))?;

            println!("Top {} Start Stations:", stations.len());
            print_stations(&stations);
            println!("\nDaily Rides ({} days):", daily.len());
            print_daily(&daily, true);
        }

        Commands::Map { input, output } => {
            let map = MapDocument::load(&input)
                .with_context(|| format!("Map file not found: {}", input.display()))?;

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() {
                            std::fs::create_dir_all(parent)?;
                        }
                    }
                    map.write_to(std::fs::File::create(&path)?)?;
                    println!("Copied {} bytes to {}", map.len(), path.display());
                }
                None => map.write_to(std::io::stdout().lock())?,
            }
        }
    }

    Ok(())
}

fn load_trips(
    pipeline: &mut DashboardPipeline,
    input: &Path,
) -> Result<Arc<TripTable>> {
    let progress = ProgressReporter::new_spinner("Reading trip data...", false);
    let table = pipeline
        .load_trips(input)
        .with_context(|| load_failure(input))?;
    progress.finish_with_message(&format!("Loaded {} trips", table.len()));
    Ok(table)
}

fn load_failure(input: &Path) -> String {
    format!("Could not load the trip file {}", input.display())
}

fn output_target(
    explicit: Option<PathBuf>,
    save: bool,
    default: impl FnOnce() -> PathBuf,
) -> Option<PathBuf> {
    explicit.or_else(|| save.then(default))
}

fn print_stations(stations: &[StationAggregate]) {
    for (i, station) in stations.iter().enumerate() {
        println!(
            "{:>3}. {:<45} {:>8}",
            i + 1,
            station.station_name,
            station.trip_count
        );
    }
}

fn print_daily(series: &JoinedSeries, with_temperature: bool) {
    for day in series.iter() {
        if with_temperature {
            let temp = day
                .avg_temperature
                .map(|t| format!("{:.1}°C", t))
                .unwrap_or_else(|| "-".to_string());
            println!("{}  {:>7}  {:>7}", day.date, day.trip_count, temp);
        } else {
            println!("{}  {:>7}", day.date, day.trip_count);
        }
    }
}

fn print_conditions(conditions: &[Condition]) {
    for condition in conditions {
        println!("⚠️  {}", condition);
    }
}
