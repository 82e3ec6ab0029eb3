//! Capability interfaces consumed by the collection pipeline.
//!
//! The pipeline never touches the filesystem or UI directly. It talks to
//! these traits, so the real vault-backed implementations can be swapped for
//! in-memory fakes in tests.

use async_trait::async_trait;

use crate::error::Result;

/// The kind of entry resolved at a vault-relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultEntry {
    File,
    Folder,
}

/// A markdown note known to the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    /// Vault-relative, `/`-separated path.
    pub path: String,
}

/// Cached structural metadata for a single note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteMetadata {
    /// Tags declared in YAML frontmatter, `#`-prefixed.
    pub frontmatter_tags: Vec<String>,
    /// Tags written inline in the body, `#`-prefixed.
    pub inline_tags: Vec<String>,
}

impl NoteMetadata {
    /// All tags declared by the note, deduplicated, frontmatter first.
    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.frontmatter_tags
            .iter()
            .chain(self.inline_tags.iter())
            .filter(|tag| seen.insert(tag.as_str()))
            .cloned()
            .collect()
    }
}

/// Read/write access to the documents of a vault.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Snapshot of every markdown note currently in the vault.
    ///
    /// Documents added or removed after this call are not observed by an
    /// in-progress scan.
    fn md_files(&self) -> Vec<NoteFile>;

    /// Resolve a vault-relative path to an existing entry, if any.
    fn entry_at(&self, path: &str) -> Option<VaultEntry>;

    /// Read the current content of the file at `path`.
    async fn read(&self, path: &str) -> Result<String>;

    /// Create a new file at `path` with the given content.
    async fn create(&self, path: &str, content: &str) -> Result<()>;

    /// Overwrite the content of the existing file at `path`.
    async fn modify(&self, path: &str, content: &str) -> Result<()>;

    /// Create a folder at `path`. Parents must already exist.
    async fn create_folder(&self, path: &str) -> Result<()>;
}

/// Lookup of cached note metadata.
pub trait MetadataCache: Send + Sync {
    /// Cached metadata for the note at `path`, or `None` when the cache has
    /// not seen that note. A miss is not an error; the note simply
    /// contributes no tags.
    fn metadata(&self, path: &str) -> Option<NoteMetadata>;
}

/// A transient, single-message progress surface.
pub trait Notifier: Send + Sync {
    /// Replace the displayed message.
    fn set_message(&self, message: &str);

    /// Hide the message entirely.
    fn hide(&self);
}
