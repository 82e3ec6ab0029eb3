//! In-memory fakes for the capability interfaces, shared by the pipeline
//! tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tagdex_core::error::{Result, TagdexError};
use tagdex_core::store::{
    DocumentStore, MetadataCache, NoteFile, NoteMetadata, Notifier, VaultEntry,
};

#[derive(Debug, Clone)]
pub(crate) enum MemEntry {
    File(String),
    Folder,
}

/// An in-memory document store keyed by vault-relative path.
#[derive(Debug, Default)]
pub(crate) struct MemStore {
    entries: Mutex<HashMap<String, MemEntry>>,
}

impl MemStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_file(&self, path: &str, content: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(path.to_string(), MemEntry::File(content.to_string()));
    }

    pub(crate) fn add_folder(&self, path: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(path.to_string(), MemEntry::Folder);
    }

    pub(crate) fn content(&self, path: &str) -> Option<String> {
        match self.entries.lock().unwrap().get(path) {
            Some(MemEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub(crate) fn folder_exists(&self, path: &str) -> bool {
        matches!(
            self.entries.lock().unwrap().get(path),
            Some(MemEntry::Folder)
        )
    }
}

#[async_trait]
impl DocumentStore for MemStore {
    fn md_files(&self) -> Vec<NoteFile> {
        let entries = self.entries.lock().unwrap();
        let mut paths: Vec<String> = entries
            .iter()
            .filter(|(path, entry)| {
                matches!(entry, MemEntry::File(_)) && path.ends_with(".md")
            })
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths.into_iter().map(|path| NoteFile { path }).collect()
    }

    fn entry_at(&self, path: &str) -> Option<VaultEntry> {
        match self.entries.lock().unwrap().get(path) {
            Some(MemEntry::File(_)) => Some(VaultEntry::File),
            Some(MemEntry::Folder) => Some(VaultEntry::Folder),
            None => None,
        }
    }

    async fn read(&self, path: &str) -> Result<String> {
        self.content(path)
            .ok_or_else(|| TagdexError::Vault(format!("no file at '{path}'")))
    }

    async fn create(&self, path: &str, content: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(path) {
            return Err(TagdexError::Vault(format!("'{path}' already exists")));
        }
        entries.insert(path.to_string(), MemEntry::File(content.to_string()));
        Ok(())
    }

    async fn modify(&self, path: &str, content: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(path) {
            Some(MemEntry::File(existing)) => {
                *existing = content.to_string();
                Ok(())
            }
            _ => Err(TagdexError::Vault(format!("no file at '{path}'"))),
        }
    }

    async fn create_folder(&self, path: &str) -> Result<()> {
        self.add_folder(path);
        Ok(())
    }
}

/// An in-memory metadata cache with explicit, per-note entries.
#[derive(Debug, Default)]
pub(crate) struct MemCache {
    notes: HashMap<String, NoteMetadata>,
}

impl MemCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_tags(&mut self, path: &str, tags: &[&str]) {
        self.notes.insert(
            path.to_string(),
            NoteMetadata {
                frontmatter_tags: tags.iter().map(|t| t.to_string()).collect(),
                inline_tags: Vec::new(),
            },
        );
    }
}

impl MetadataCache for MemCache {
    fn metadata(&self, path: &str) -> Option<NoteMetadata> {
        self.notes.get(path).cloned()
    }
}

/// Records every message it is asked to display.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) messages: Mutex<Vec<String>>,
    pub(crate) hidden: AtomicBool,
}

impl Notifier for RecordingNotifier {
    fn set_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn hide(&self) {
        self.hidden.store(true, Ordering::SeqCst);
    }
}
