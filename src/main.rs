use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use readme_stats::utils::setup_logging;
use readme_stats::{update_readme, Args, UpdateConfig, UpdateOutcome};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = UpdateConfig::from(&args);
    match update_readme(&config) {
        Ok(outcome) => {
            match &outcome {
                UpdateOutcome::Updated(document) if config.dry_run => print!("{}", document),
                UpdateOutcome::Updated(_) => println!("README Database Statistics updated"),
                UpdateOutcome::Skipped => println!("No stats available; skipping README update"),
            }
            Ok(ExitCode::from(outcome.exit_code()))
        }
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
