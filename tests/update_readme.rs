use readme_stats::{update_readme, UpdateConfig, UpdateOutcome};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const README: &str = "# Threat Feed\n\n\
## Database Statistics\n\n\
- **Total Malicious IPs**: 1\n\
- **Countries Affected**: 1\n\
- **Average Threat Severity**: 1.00/5\n\
- **Last Updated**: never\n\n\
---\n\n\
## Usage\n\n\
Download the list.\n\n\
<div align=\"center\">\n\n\
**Data Sources**: feeds\n\n\
**Last Generated**: old-value\n\n\
</div>\n";

fn workspace(readme: &str, stats: Option<&str>) -> (TempDir, UpdateConfig) {
    let dir = tempdir().unwrap();
    let readme_path = dir.path().join("README.md");
    let stats_path = dir.path().join("data").join("stats.json");
    fs::write(&readme_path, readme).unwrap();
    if let Some(stats) = stats {
        fs::create_dir_all(stats_path.parent().unwrap()).unwrap();
        fs::write(&stats_path, stats).unwrap();
    }
    let config = UpdateConfig {
        readme_path,
        stats_path,
        dry_run: false,
    };
    (dir, config)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn rewrites_block_and_last_generated() {
    let (_dir, config) = workspace(
        README,
        Some(r#"{"total_ips": 15234, "countries_affected": 42, "severity_avg": 3.7, "update_time": "2024-03-01T12:00:00"}"#),
    );

    let outcome = update_readme(&config).unwrap();
    assert_eq!(outcome.exit_code(), 0);

    let expected = README
        .replace("IPs**: 1\n", "IPs**: 15,234\n")
        .replace("Affected**: 1\n", "Affected**: 42\n")
        .replace("1.00/5", "3.70/5")
        .replace("Updated**: never", "Updated**: 2024-03-01 12:00:00 UTC")
        .replace("old-value", "2024-03-01 12:00:00 UTC");
    assert_eq!(read(&config.readme_path), expected);
    assert_eq!(outcome, UpdateOutcome::Updated(expected));
}

#[test]
fn missing_stats_file_skips_without_writing() {
    let (_dir, config) = workspace(README, None);

    let outcome = update_readme(&config).unwrap();
    assert_eq!(outcome, UpdateOutcome::Skipped);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(read(&config.readme_path), README);
}

#[test]
fn empty_stats_object_skips_without_writing() {
    let (_dir, config) = workspace(README, Some("{}"));

    assert_eq!(update_readme(&config).unwrap(), UpdateOutcome::Skipped);
    assert_eq!(read(&config.readme_path), README);
}

#[test]
fn null_stats_skips_without_writing() {
    let (_dir, config) = workspace(README, Some("null"));

    assert_eq!(update_readme(&config).unwrap(), UpdateOutcome::Skipped);
    assert_eq!(read(&config.readme_path), README);
}

#[test]
fn malformed_stats_is_an_error_and_readme_is_untouched() {
    let (_dir, config) = workspace(README, Some("{not json"));

    assert!(update_readme(&config).is_err());
    assert_eq!(read(&config.readme_path), README);
}

#[test]
fn missing_readme_is_an_error() {
    let (dir, mut config) = workspace(README, Some(r#"{"total_ips": 1}"#));
    config.readme_path = dir.path().join("NOPE.md");

    let err = update_readme(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("NOPE.md"));
}

#[test]
fn readme_without_block_gets_it_prepended() {
    let original = "# Project\n\nSome text.\n";
    let (_dir, config) = workspace(original, Some(r#"{"countries": 3}"#));

    update_readme(&config).unwrap();

    let expected_block = "## Database Statistics\n\n\
- **Total Malicious IPs**: 0\n\
- **Countries Affected**: 3\n\
- **Average Threat Severity**: 0.00/5\n\
- **Last Updated**: \n\n";
    assert_eq!(
        read(&config.readme_path),
        format!("{}---\n\n{}", expected_block, original)
    );
}

#[test]
fn dry_run_leaves_file_untouched() {
    let (_dir, mut config) = workspace(README, Some(r#"{"total_ips": 2000000}"#));
    config.dry_run = true;

    match update_readme(&config).unwrap() {
        UpdateOutcome::Updated(document) => {
            assert!(document.contains("- **Total Malicious IPs**: 2,000,000\n"))
        }
        UpdateOutcome::Skipped => panic!("expected an update"),
    }
    assert_eq!(read(&config.readme_path), README);
}
