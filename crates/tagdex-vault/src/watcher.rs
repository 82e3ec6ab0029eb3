//! File system watcher for re-running the index build on vault changes.
//!
//! Uses the `notify` crate for cross-platform file system events (FSEvents
//! on macOS, inotify on Linux, ReadDirectoryChanges on Windows). Events are
//! reduced to vault-relative markdown paths; hidden directories and the
//! index target itself are filtered out so a finished write does not
//! retrigger a build.

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use tagdex_core::error::TagdexError;

/// Changes emitted by the vault watcher, as vault-relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultChange {
    /// A markdown note was created or modified.
    Changed(String),
    /// A markdown note was deleted.
    Removed(String),
}

/// Watches a vault directory and emits markdown change events.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::Receiver<VaultChange>,
}

impl VaultWatcher {
    /// Start watching a vault directory.
    ///
    /// Events for `ignore_path` (the index target) are suppressed.
    ///
    /// # Errors
    ///
    /// Returns [`TagdexError::Io`] if the watcher cannot be created.
    pub fn start(vault_root: &Path, ignore_path: Option<String>) -> Result<Self, TagdexError> {
        let (tx, rx) = mpsc::channel();
        let root = vault_root.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in &event.paths {
                    if path.extension().and_then(|e| e.to_str()) != Some("md") {
                        continue;
                    }
                    let Ok(rel) = path.strip_prefix(&root) else {
                        continue;
                    };
                    let rel = rel.to_string_lossy().replace('\\', "/");
                    // Skip hidden directories (.tagdex, .obsidian, ...).
                    if rel
                        .split('/')
                        .next()
                        .is_some_and(|first| first.starts_with('.'))
                    {
                        continue;
                    }
                    if ignore_path.as_deref() == Some(rel.as_str()) {
                        continue;
                    }

                    let change = match event.kind {
                        EventKind::Create(_) | EventKind::Modify(_) => {
                            VaultChange::Changed(rel)
                        }
                        EventKind::Remove(_) => VaultChange::Removed(rel),
                        _ => continue,
                    };
                    let _ = tx.send(change);
                }
            }
        })
        .map_err(|e| TagdexError::Io(std::io::Error::other(e)))?;

        watcher
            .watch(vault_root, RecursiveMode::Recursive)
            .map_err(|e| TagdexError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Receive the next change with a timeout.
    ///
    /// Returns `None` if no change arrives within the timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<VaultChange> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Receive the next change without blocking.
    pub fn try_recv(&self) -> Option<VaultChange> {
        self.receiver.try_recv().ok()
    }
}
