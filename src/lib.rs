pub mod args;
pub mod block;
pub mod patcher;
pub mod stats;
pub mod update;
pub mod utils;

pub use args::Args;
pub use block::build_block;
pub use patcher::{replace_stats_block, update_last_generated};
pub use stats::{load_stats, StatsRecord};
pub use update::{patch_document, update_readme, UpdateConfig, UpdateOutcome};
