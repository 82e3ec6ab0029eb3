//! # tagdex-vault
//!
//! Filesystem-backed document store for a markdown vault, plus the metadata
//! scanner that feeds the tag collector and a file watcher for automatic
//! re-runs.
//!
//! The vault is the source of truth; the generated index document is derived
//! state and the only file this crate ever writes back.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use tagdex_core::error::{Result, TagdexError};
use tagdex_core::store::{DocumentStore, NoteFile, VaultEntry};

pub mod metadata;
pub mod watcher;

pub use metadata::MetadataIndex;
pub use watcher::{VaultChange, VaultWatcher};

/// A markdown vault rooted at a directory on disk.
///
/// All paths exchanged with the store are vault-relative and `/`-separated,
/// regardless of platform.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Open an existing vault directory.
    ///
    /// # Errors
    ///
    /// Returns [`TagdexError::Vault`] when `root` is not a directory.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(TagdexError::Vault(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

/// Recursively collect markdown files below `dir`, skipping hidden entries.
fn collect_md_files(root: &Path, dir: &Path, out: &mut Vec<NoteFile>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_md_files(root, &path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            let rel = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            out.push(NoteFile { path: rel });
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for FsVault {
    fn md_files(&self) -> Vec<NoteFile> {
        let mut files = Vec::new();
        if let Err(err) = collect_md_files(&self.root, &self.root, &mut files) {
            tracing::warn!(
                vault = %self.root.display(),
                error = %err,
                "failed to enumerate part of the vault"
            );
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn entry_at(&self, path: &str) -> Option<VaultEntry> {
        let meta = fs::metadata(self.absolute(path)).ok()?;
        if meta.is_dir() {
            Some(VaultEntry::Folder)
        } else {
            Some(VaultEntry::File)
        }
    }

    async fn read(&self, path: &str) -> Result<String> {
        Ok(tokio::fs::read_to_string(self.absolute(path)).await?)
    }

    async fn create(&self, path: &str, content: &str) -> Result<()> {
        let abs = self.absolute(path);
        if abs.exists() {
            return Err(TagdexError::Vault(format!("'{path}' already exists")));
        }
        tokio::fs::write(abs, content).await?;
        Ok(())
    }

    async fn modify(&self, path: &str, content: &str) -> Result<()> {
        tokio::fs::write(self.absolute(path), content).await?;
        Ok(())
    }

    async fn create_folder(&self, path: &str) -> Result<()> {
        tokio::fs::create_dir(self.absolute(path)).await?;
        Ok(())
    }
}
