use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::block::build_block;
use crate::patcher::{replace_stats_block, update_last_generated};
use crate::stats::{load_stats, StatsRecord, DEFAULT_STATS_PATH};
use crate::utils::format_time;
use crate::Args;

pub const DEFAULT_README_PATH: &str = "README.md";

#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub readme_path: PathBuf,
    pub stats_path: PathBuf,
    pub dry_run: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        UpdateConfig {
            readme_path: PathBuf::from(DEFAULT_README_PATH),
            stats_path: PathBuf::from(DEFAULT_STATS_PATH),
            dry_run: false,
        }
    }
}

impl From<&Args> for UpdateConfig {
    fn from(args: &Args) -> Self {
        UpdateConfig {
            readme_path: args.readme.clone(),
            stats_path: args.stats.clone(),
            dry_run: args.dry_run,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The README was rewritten, or in dry-run mode, rendered.
    Updated(String),
    /// No stats were available; the README was not touched.
    Skipped,
}

impl UpdateOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            UpdateOutcome::Updated(_) => 0,
            UpdateOutcome::Skipped => 1,
        }
    }
}

/// Applies the statistics block and the Last Generated annotation in memory.
pub fn patch_document(content: &str, stats: &StatsRecord) -> Result<String> {
    let block = build_block(stats)?;
    let patched = replace_stats_block(content, &block)?;

    let generated = format_time(&stats.update_time());
    if generated.is_empty() {
        warn!(action = "skip", component = "last_generated", "No update time in stats, leaving Last Generated untouched");
        return Ok(patched);
    }
    update_last_generated(&patched, &generated)
}

pub fn update_readme(config: &UpdateConfig) -> Result<UpdateOutcome> {
    let total_start_time = Instant::now();
    info!(
        action = "start",
        component = "readme_update",
        readme = ?config.readme_path,
        stats = ?config.stats_path,
        dry_run = config.dry_run,
        "Starting README update"
    );

    let stats = match load_stats(&config.stats_path)? {
        Some(stats) => stats,
        None => {
            warn!(action = "skip", component = "readme_update", "No stats available");
            return Ok(UpdateOutcome::Skipped);
        }
    };

    let content = fs::read_to_string(&config.readme_path)
        .with_context(|| format!("Failed to read README {:?}", config.readme_path))?;
    let patched = patch_document(&content, &stats)?;

    if config.dry_run {
        info!(action = "dry_run", component = "readme_update", "Dry run, README not written");
    } else {
        fs::write(&config.readme_path, &patched)
            .with_context(|| format!("Failed to write README {:?}", config.readme_path))?;
    }

    info!(
        action = "complete",
        component = "readme_update",
        bytes_before = content.len(),
        bytes_after = patched.len(),
        duration_ms = total_start_time.elapsed().as_millis(),
        "README update completed"
    );
    Ok(UpdateOutcome::Updated(patched))
}
