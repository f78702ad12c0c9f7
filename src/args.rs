use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "readme-stats",
    about = "Refresh the Database Statistics block of a README from a JSON stats file",
    version,
    long_about = None
)]
pub struct Args {
    /// README file to update in place
    #[arg(short, long, default_value = "README.md")]
    pub readme: PathBuf,

    /// JSON statistics file
    #[arg(short, long, default_value = "data/stats.json")]
    pub stats: PathBuf,

    /// Print the updated README instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
