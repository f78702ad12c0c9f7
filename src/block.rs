use anyhow::Result;

use crate::stats::StatsRecord;
use crate::utils::{format_number, format_time};

pub const STATS_HEADING: &str = "## Database Statistics";

/// Renders the statistics block, ending in a blank line. The `---`
/// separator is not part of the block.
pub fn build_block(stats: &StatsRecord) -> Result<String> {
    let update_time = format_time(&stats.update_time());
    let total = stats.total_ips()?;
    let countries = stats.countries_affected()?;
    let severity = stats.severity_avg()?;

    Ok(format!(
        "{}\n\n\
         - **Total Malicious IPs**: {}\n\
         - **Countries Affected**: {}\n\
         - **Average Threat Severity**: {:.2}/5\n\
         - **Last Updated**: {}\n\n",
        STATS_HEADING,
        format_number(total),
        countries,
        severity,
        update_time
    ))
}
