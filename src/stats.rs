use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub const DEFAULT_STATS_PATH: &str = "data/stats.json";

const TOTAL_IPS_KEYS: &[&str] = &["total_ips"];
const COUNTRIES_KEYS: &[&str] = &["countries_affected", "countries"];
const SEVERITY_KEYS: &[&str] = &["severity_avg", "average_severity"];
const UPDATE_TIME_KEYS: &[&str] = &["update_time", "update_time_iso"];

/// Snapshot of the threat database statistics, as written by the exporter.
///
/// Every field is optional and several have an older alias, so the record
/// keeps the raw JSON object and resolves each field on demand against an
/// ordered list of candidate keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StatsRecord(Map<String, Value>);

impl StatsRecord {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_ips(&self) -> Result<i128> {
        self.first_set(TOTAL_IPS_KEYS)
            .map_or(Ok(0), |(key, value)| as_integer(key, value))
    }

    pub fn countries_affected(&self) -> Result<i128> {
        self.first_set(COUNTRIES_KEYS)
            .map_or(Ok(0), |(key, value)| as_integer(key, value))
    }

    pub fn severity_avg(&self) -> Result<f64> {
        self.first_set(SEVERITY_KEYS)
            .map_or(Ok(0.0), |(key, value)| as_float(key, value))
    }

    /// Raw update time, or an empty string when no candidate key is set.
    pub fn update_time(&self) -> String {
        match self.first_set(UPDATE_TIME_KEYS) {
            Some((_, Value::String(s))) => s.clone(),
            Some((_, other)) => other.to_string(),
            None => String::new(),
        }
    }

    /// First candidate holding a meaningful value. Zero, empty and null
    /// values fall through to the next alias.
    fn first_set(&self, keys: &[&'static str]) -> Option<(&'static str, &Value)> {
        keys.iter()
            .find_map(|key| self.0.get(*key).filter(|v| is_set(v)).map(|v| (*key, v)))
    }
}

impl From<Map<String, Value>> for StatsRecord {
    fn from(map: Map<String, Value>) -> Self {
        StatsRecord(map)
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// Floats beyond this lose integer precision and are rejected.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn as_integer(key: &str, value: &Value) -> Result<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() <= MAX_EXACT_FLOAT)
                    .map(|f| f.trunc() as i128)
            })
            .with_context(|| format!("Stats field '{}' is out of range: {}", key, n)),
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .with_context(|| format!("Stats field '{}' is not an integer: {:?}", key, s)),
        Value::Bool(b) => Ok(i128::from(*b)),
        other => anyhow::bail!("Stats field '{}' is not an integer: {}", key, other),
    }
}

fn as_float(key: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .with_context(|| format!("Stats field '{}' is out of range: {}", key, n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Stats field '{}' is not a number: {:?}", key, s)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => anyhow::bail!("Stats field '{}' is not a number: {}", key, other),
    }
}

/// Loads the stats record. Returns `None` when the file does not exist or
/// holds an empty value (`{}`, `[]`, `null`, `0`, `false`, `""`).
pub fn load_stats(path: &Path) -> Result<Option<StatsRecord>> {
    let start_time = Instant::now();
    info!(action = "start", component = "stats_loading", file_path = ?path, "Loading stats file");

    if !path.exists() {
        info!(action = "missing", component = "stats_loading", file_path = ?path, "Stats file not found");
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stats file {:?}", path))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse stats file {:?}", path))?;

    if !is_set(&value) {
        info!(action = "empty", component = "stats_loading", file_path = ?path, "Stats file holds no data");
        return Ok(None);
    }

    let record = match value {
        Value::Object(map) => StatsRecord::from(map),
        other => anyhow::bail!(
            "Stats file {:?} must contain a JSON object, found {}",
            path,
            json_kind(&other)
        ),
    };

    info!(
        action = "complete",
        component = "stats_loading",
        key_count = record.0.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Loaded stats file"
    );
    Ok(Some(record))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
