//! The update orchestrator: resolve, collect, format, write, summarize.
//!
//! One `IndexUpdater` owns the capability implementations and the single
//! in-flight guard. A run resolves the target path, scans with the target
//! excluded so the index never indexes itself, and finishes with the
//! idempotent write and a human-readable summary.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tagdex_core::error::{Result, TagdexError};
use tagdex_core::format::format_tag_index;
use tagdex_core::paths::resolve_target_file_path;
use tagdex_core::settings::{Settings, DEFAULT_TARGET_FILE_PATH};
use tagdex_core::store::{DocumentStore, MetadataCache, Notifier};

use crate::collector::{collect_all_tags, CollectConfig, CollectProgress, DEFAULT_BATCH_SIZE};
use crate::writer::{write_index_file, WriteOutcome};

/// Minimum wall-clock spacing between intermediate progress notifications.
const PROGRESS_THROTTLE: Duration = Duration::from_millis(150);

/// Cache-miss thresholds past which the summary suggests a retry; the
/// metadata cache may still be warming up after vault load.
const RETRY_HINT_MIN_MISSING: usize = 50;
const RETRY_HINT_MIN_RATIO: f64 = 0.1;

/// Everything a finished run reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSummary {
    pub outcome: WriteOutcome,
    pub tag_count: usize,
    pub target_path: String,
    pub total_files: usize,
    pub excluded_files: usize,
    pub files_with_cache: usize,
    pub elapsed: Duration,
}

impl UpdateSummary {
    /// Documents actually scanned for tags.
    #[must_use]
    pub fn scanned_files(&self) -> usize {
        self.total_files.saturating_sub(self.excluded_files)
    }

    /// Scanned documents that had no cached metadata.
    #[must_use]
    pub fn missing_cache(&self) -> usize {
        self.scanned_files().saturating_sub(self.files_with_cache)
    }

    /// The user-facing outcome message, including the cache-coverage note.
    #[must_use]
    pub fn message(&self) -> String {
        let missing = self.missing_cache();
        let scanned = self.scanned_files();
        let missing_ratio = if scanned > 0 {
            missing as f64 / scanned as f64
        } else {
            0.0
        };
        let suggest_retry =
            missing >= RETRY_HINT_MIN_MISSING || missing_ratio >= RETRY_HINT_MIN_RATIO;

        let cache_note = if missing > 0 {
            if suggest_retry {
                format!(" (cache missing for {missing} files; try running again in a moment)")
            } else {
                format!(" (cache missing for {missing} files)")
            }
        } else {
            String::new()
        };

        let elapsed = format!("{:.1}", self.elapsed.as_secs_f64());
        match self.outcome {
            WriteOutcome::Skipped => format!(
                "Tag index is already up to date ({} tags, {}s){}.",
                self.tag_count, elapsed, cache_note
            ),
            WriteOutcome::Created => format!(
                "Tag index created ({} tags, {}s){}.",
                self.tag_count, elapsed, cache_note
            ),
            WriteOutcome::Modified => format!(
                "Tag index updated ({} tags, {}s){}.",
                self.tag_count, elapsed, cache_note
            ),
        }
    }
}

/// Wires the pipeline together over injected capability implementations.
pub struct IndexUpdater<S, M, N> {
    store: S,
    cache: M,
    notifier: N,
    settings: Settings,
    batch_size: usize,
    update_in_progress: AtomicBool,
}

impl<S, M, N> IndexUpdater<S, M, N>
where
    S: DocumentStore,
    M: MetadataCache,
    N: Notifier,
{
    pub fn new(store: S, cache: M, notifier: N, settings: Settings) -> Self {
        Self {
            store,
            cache,
            notifier,
            settings,
            batch_size: DEFAULT_BATCH_SIZE,
            update_in_progress: AtomicBool::new(false),
        }
    }

    /// Override the scan batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// The effective target path from settings.
    ///
    /// # Errors
    ///
    /// Returns [`TagdexError::Config`] when the configured path is invalid.
    pub fn target_path(&self) -> Result<String> {
        let resolved =
            resolve_target_file_path(&self.settings.target_file_path, DEFAULT_TARGET_FILE_PATH)?;
        Ok(resolved.path)
    }

    /// Run one full index update.
    ///
    /// A second call while a run is active is rejected with
    /// [`TagdexError::UpdateInProgress`], never queued or merged. The guard
    /// is released on every exit path.
    pub async fn run(&self) -> Result<UpdateSummary> {
        if self.update_in_progress.swap(true, Ordering::SeqCst) {
            return Err(TagdexError::UpdateInProgress);
        }
        let _guard = InFlightGuard(&self.update_in_progress);

        let result = self.run_inner().await;
        match &result {
            Ok(summary) => self.notifier.set_message(&summary.message()),
            Err(err) => {
                self.notifier.hide();
                tracing::error!(error = %err, "tag index update failed");
            }
        }
        result
    }

    async fn run_inner(&self) -> Result<UpdateSummary> {
        let started = Instant::now();
        self.notifier.set_message("Updating tag index...");

        let target_path = self.target_path()?;

        let mut exclude_paths = HashSet::new();
        exclude_paths.insert(target_path.clone());

        let notifier = &self.notifier;
        let mut last_update: Option<Instant> = None;
        let mut on_progress = |progress: CollectProgress| {
            let complete = progress.processed_files == progress.total_files;
            if !complete && last_update.is_some_and(|at| at.elapsed() < PROGRESS_THROTTLE) {
                return;
            }
            last_update = Some(Instant::now());
            notifier.set_message(&format!(
                "Updating tag index... {}/{}",
                progress.processed_files, progress.total_files
            ));
        };

        let collection = collect_all_tags(
            &self.store,
            &self.cache,
            CollectConfig {
                exclude_paths,
                exclude_folder_paths: self.settings.normalized_excluded_folders(),
                batch_size: self.batch_size,
                on_progress: Some(&mut on_progress),
            },
        )
        .await;

        let content = format_tag_index(&collection.tags);
        let outcome = write_index_file(&self.store, &target_path, &content).await?;

        Ok(UpdateSummary {
            outcome,
            tag_count: collection.tags.len(),
            target_path,
            total_files: collection.total_files,
            excluded_files: collection.excluded_files,
            files_with_cache: collection.files_with_cache,
            elapsed: started.elapsed(),
        })
    }
}

/// Clears the in-flight flag when dropped, on success, error, or panic.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
