//! Rendering of the tag index document, and the volatile-line mask used to
//! decide whether a rewrite is needed.
//!
//! The `Last updated:` line changes on every run. Comparing raw contents
//! would therefore always report a change and defeat idempotent writes, so
//! equality is checked with that line replaced by a fixed marker on both
//! sides. The mask lives next to the formatter so the line format and the
//! mask change together.

use chrono::Local;

/// Title line of the generated index document.
pub const INDEX_TITLE: &str = "# Tag Index";

/// Prefix of the volatile timestamp line.
pub const LAST_UPDATED_PREFIX: &str = "Last updated: ";

const MASKED_LINE: &str = "Last updated: <volatile>";

/// Render the index document for a sorted, deduplicated tag list.
///
/// Tags are emitted as one bullet per line in input order. The embedded
/// timestamp is wall-clock local time and differs between runs; see
/// [`content_matches_ignoring_timestamp`].
#[must_use]
pub fn format_tag_index(tags: &[String]) -> String {
    let timestamp = Local::now().format("%m/%d/%Y, %I:%M %p");

    let mut lines: Vec<String> = vec![
        INDEX_TITLE.to_string(),
        String::new(),
        format!("{LAST_UPDATED_PREFIX}{timestamp}"),
        String::new(),
        format!("## All Tags ({})", tags.len()),
        String::new(),
    ];

    if tags.is_empty() {
        lines.push("*No tags found.*".to_string());
    } else {
        for tag in tags {
            lines.push(format!("- {tag}"));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Content equality under the volatile-field mask.
///
/// Both operands have their `Last updated:` line replaced by a constant
/// marker before comparison, so two renders of the same tag list compare
/// equal even though their timestamps differ.
#[must_use]
pub fn content_matches_ignoring_timestamp(a: &str, b: &str) -> bool {
    mask_volatile_lines(a) == mask_volatile_lines(b)
}

fn mask_volatile_lines(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if line.starts_with(LAST_UPDATED_PREFIX) {
                MASKED_LINE
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
