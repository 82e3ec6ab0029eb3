//! Vault-relative path resolution for the index target and exclusion folders.
//!
//! Every path handled here is vault-relative: rooted at the vault directory,
//! `/`-separated, never absolute, and never escaping the vault via `..`.
//! Backslashes are treated as path separators so Windows-style input still
//! resolves to the same vault location.

use crate::error::PathError;

/// Outcome of resolving the configured target file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTargetPath {
    /// Normalized vault-relative path, always ending in `.md`.
    pub path: String,
    /// True when the `.md` extension was appended automatically.
    pub did_append_md: bool,
}

/// Resolve the configured target file path into a normalized, vault-relative
/// markdown file path.
///
/// A blank `raw` value falls back to `fallback`. The result is guaranteed to
/// be vault-relative (no absolute paths, drive letters, or URLs), free of
/// `..` segments, and to end in `.md`, appended automatically when the input
/// has no extension.
///
/// # Errors
///
/// Returns [`PathError::Empty`] when both inputs are blank,
/// [`PathError::Extension`] when a non-`.md` extension is supplied, and
/// [`PathError::Invalid`] for every other rejected shape. The message names
/// the specific rule that failed.
pub fn resolve_target_file_path(
    raw: &str,
    fallback: &str,
) -> Result<ResolvedTargetPath, PathError> {
    let configured = raw.trim();
    let fallback = fallback.trim();
    let initial = if configured.is_empty() {
        fallback
    } else {
        configured
    };

    if initial.is_empty() {
        return Err(PathError::Empty);
    }

    let slashed = initial.replace('\\', "/");

    if slashed.starts_with('/') {
        return Err(PathError::Invalid(
            "absolute paths are not vault-relative".to_string(),
        ));
    }
    if has_drive_prefix(initial) || has_drive_prefix(&slashed) {
        return Err(PathError::Invalid(
            "drive paths are not vault-relative".to_string(),
        ));
    }
    if slashed.contains("://") {
        return Err(PathError::Invalid(
            "URLs are not vault-relative".to_string(),
        ));
    }
    if slashed.ends_with('/') {
        return Err(PathError::Invalid(
            "path names a folder (remove the trailing '/')".to_string(),
        ));
    }
    // Checked on the slash-normalized form, before canonicalization can
    // change the shape of the path.
    if slashed.split('/').any(|segment| segment == "..") {
        return Err(PathError::Invalid(
            "'..' segments are not allowed".to_string(),
        ));
    }

    let normalized = canonicalize(&slashed);
    let basename = normalized.rsplit('/').next().unwrap_or("");
    if basename.trim().is_empty() {
        return Err(PathError::Invalid("path has no file name".to_string()));
    }

    match basename.rfind('.') {
        // No extension (a leading dot is a hidden-file name, not an
        // extension separator): append `.md`.
        None | Some(0) => Ok(ResolvedTargetPath {
            path: format!("{normalized}.md"),
            did_append_md: true,
        }),
        Some(pos) => {
            if basename[pos..].eq_ignore_ascii_case(".md") {
                Ok(ResolvedTargetPath {
                    path: normalized,
                    did_append_md: false,
                })
            } else {
                Err(PathError::Extension)
            }
        }
    }
}

/// Normalize a vault-relative folder path.
///
/// Returns `None` when the value is empty, points at the vault root, or has
/// any invalid shape (absolute path, URL, drive path, `..` segment). `None`
/// is advisory rather than an error; callers drop the entry and move on.
#[must_use]
pub fn normalize_vault_folder_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let slashed = trimmed.replace('\\', "/");
    if slashed.starts_with('/')
        || has_drive_prefix(trimmed)
        || has_drive_prefix(&slashed)
        || slashed.contains("://")
    {
        return None;
    }

    // Trailing slashes are stripped so folders are represented consistently
    // before prefix construction: `A` must exclude `A/B` but never `AB`.
    let stripped = slashed.trim_end_matches('/');
    if stripped.is_empty() {
        return None;
    }
    if stripped.split('/').any(|segment| segment == "..") {
        return None;
    }

    let normalized = canonicalize(stripped);
    if normalized.is_empty() {
        return None;
    }

    Some(normalized)
}

fn has_drive_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

/// Collapse repeated separators and `.` segments.
fn canonicalize(value: &str) -> String {
    value
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
