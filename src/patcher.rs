use anyhow::Result;
use regex::{NoExpand, Regex};
use tracing::info;

pub const SEPARATOR: &str = "---";
pub const LAST_GENERATED_MARKER: &str = "**Last Generated**:";
pub const DATA_SOURCES_MARKER: &str = "Data Sources";
pub const CLOSING_TAG: &str = "</div>";

// Heading through the next line that is exactly `---`, shortest match.
const STATS_SPAN_PATTERN: &str = r"(?msR)## Database Statistics.*?\n---$";
const LAST_GENERATED_PATTERN: &str = r"\*\*Last Generated\*\*:[^\r\n]*";

/// `\r\n` when the document already uses CRLF line endings, `\n` otherwise.
fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn with_line_ending(text: &str, eol: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', eol)
}

/// Replaces the first Database Statistics span with `block` followed by the
/// separator. Without a span the block is prepended to the document.
/// Inserted text follows the document's line endings.
pub fn replace_stats_block(content: &str, block: &str) -> Result<String> {
    let pattern = Regex::new(STATS_SPAN_PATTERN)?;
    let eol = line_ending(content);
    let new_block = format!("{}{}", with_line_ending(block, eol), SEPARATOR);

    if pattern.is_match(content) {
        info!(action = "replace", component = "stats_block", "Replacing existing statistics block");
        Ok(pattern
            .replacen(content, 1, NoExpand(&new_block))
            .into_owned())
    } else {
        info!(action = "prepend", component = "stats_block", "Statistics block not found, prepending");
        Ok(format!("{}{}{}{}", new_block, eol, eol, content))
    }
}

/// Points the `**Last Generated**:` annotation at `timestamp`, inserting
/// it before the closing tag of the Data Sources section, or at the end of
/// the document, when the annotation is missing.
pub fn update_last_generated(content: &str, timestamp: &str) -> Result<String> {
    let pattern = Regex::new(LAST_GENERATED_PATTERN)?;
    let eol = line_ending(content);
    let annotation = format!("{} {}", LAST_GENERATED_MARKER, timestamp);

    if pattern.is_match(content) {
        info!(action = "replace", component = "last_generated", timestamp = timestamp, "Updating Last Generated annotation");
        return Ok(pattern
            .replacen(content, 1, NoExpand(&annotation))
            .into_owned());
    }

    if let Some(at) = closing_tag_after_data_sources(content) {
        info!(action = "insert", component = "last_generated", offset = at, "Inserting Last Generated annotation before Data Sources closing tag");
        let mut result = String::with_capacity(content.len() + annotation.len() + 4);
        result.push_str(&content[..at]);
        result.push_str(&annotation);
        result.push_str(eol);
        result.push_str(eol);
        result.push_str(&content[at..]);
        return Ok(result);
    }

    info!(action = "append", component = "last_generated", "No anchor for Last Generated annotation, appending");
    let mut result = content.to_string();
    if !result.is_empty() && !result.ends_with('\n') {
        result.push_str(eol);
    }
    result.push_str(eol);
    result.push_str(&annotation);
    result.push_str(eol);
    Ok(result)
}

fn closing_tag_after_data_sources(content: &str) -> Option<usize> {
    let start = content.find(DATA_SOURCES_MARKER)? + DATA_SOURCES_MARKER.len();
    content[start..].find(CLOSING_TAG).map(|offset| start + offset)
}
