use anyhow::Result;
use bikeshare_processor::cli::{init_logging, run, Cli};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    run(cli)
}
