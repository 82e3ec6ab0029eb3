//! Note metadata extraction: frontmatter `tags:` plus inline `#tags`.
//!
//! Notes use the common vault convention of an optional `---` delimited YAML
//! frontmatter block followed by a markdown body. Tags come from two places:
//! the frontmatter `tags` field (a sequence or a comma/space separated
//! string) and inline `#tag` tokens in the body. Fenced code blocks are not
//! scanned for inline tags.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use tagdex_core::store::{DocumentStore, MetadataCache, NoteMetadata};

// An inline tag needs at least one character that is not a digit, so `#1`
// (a heading reference or issue number) never counts.
static INLINE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)#([-_/0-9A-Za-z]*[-_/A-Za-z][-_/0-9A-Za-z]*)").expect("valid regex")
});

/// Split a note into its YAML frontmatter and body.
///
/// Returns `None` when the note has no frontmatter block; that is a normal
/// note shape, not an error.
#[must_use]
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest.strip_prefix('\n')?;

    let close = rest.find("\n---")?;
    let yaml = &rest[..close];
    let body = &rest[close + 4..];
    let body = body.strip_prefix('\r').unwrap_or(body);
    let body = body.strip_prefix('\n').unwrap_or(body);
    Some((yaml, body))
}

/// Extract tags from a frontmatter YAML block.
///
/// Accepts both the sequence form (`tags: [a, b]` or a `-` list) and the
/// loose string form (`tags: a, b`). Unparsable YAML yields no tags.
#[must_use]
pub fn frontmatter_tags(yaml: &str) -> Vec<String> {
    let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(yaml) else {
        return Vec::new();
    };
    let Some(tags) = value.get("tags") else {
        return Vec::new();
    };

    match tags {
        serde_yaml::Value::String(s) => s
            .split([',', ' '])
            .filter_map(normalize_tag)
            .collect(),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .filter_map(|item| match item {
                serde_yaml::Value::String(s) => normalize_tag(s),
                serde_yaml::Value::Number(n) => normalize_tag(&n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Extract inline `#tag` tokens from a note body, skipping fenced code
/// blocks.
#[must_use]
pub fn inline_tags(body: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut in_code_fence = false;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_code_fence = !in_code_fence;
            continue;
        }
        if in_code_fence {
            continue;
        }
        for capture in INLINE_TAG.captures_iter(line) {
            if let Some(tag) = normalize_tag(&capture[1]) {
                tags.push(tag);
            }
        }
    }

    tags
}

/// Scan a note's content into its metadata.
#[must_use]
pub fn scan_note(content: &str) -> NoteMetadata {
    match split_frontmatter(content) {
        Some((yaml, body)) => NoteMetadata {
            frontmatter_tags: frontmatter_tags(yaml),
            inline_tags: inline_tags(body),
        },
        None => NoteMetadata {
            frontmatter_tags: Vec::new(),
            inline_tags: inline_tags(content),
        },
    }
}

/// Normalize a raw tag token to the canonical `#tag` form.
fn normalize_tag(raw: &str) -> Option<String> {
    let stripped = raw.trim().trim_start_matches('#');
    if stripped.is_empty() {
        return None;
    }
    Some(format!("#{stripped}"))
}

/// Scanned metadata for every note in a store, keyed by vault-relative path.
///
/// Built once per run by reading every note. A note that cannot be read is
/// left out of the index and surfaces through the cache-coverage
/// diagnostics rather than failing the scan.
#[derive(Debug, Default)]
pub struct MetadataIndex {
    notes: HashMap<String, NoteMetadata>,
}

impl MetadataIndex {
    /// Scan every note in `store`.
    pub async fn build<S: DocumentStore + ?Sized>(store: &S) -> Self {
        let mut notes = HashMap::new();
        for file in store.md_files() {
            match store.read(&file.path).await {
                Ok(content) => {
                    notes.insert(file.path, scan_note(&content));
                }
                Err(err) => {
                    tracing::warn!(
                        path = %file.path,
                        error = %err,
                        "failed to read note, leaving it out of the metadata index"
                    );
                }
            }
        }
        Self { notes }
    }

    /// Number of notes with scanned metadata.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl MetadataCache for MetadataIndex {
    fn metadata(&self, path: &str) -> Option<NoteMetadata> {
        self.notes.get(path).cloned()
    }
}
