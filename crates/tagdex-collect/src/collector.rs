//! Batched, cooperatively yielding tag collection across the vault.
//!
//! The collector takes one snapshot of the document list and walks it in
//! order, asking the metadata cache for each non-excluded note's tags. After
//! every batch it reports progress and yields back to the scheduler, so a
//! scan over tens of thousands of notes never monopolizes the event loop.

use std::collections::{BTreeSet, HashSet};

use tagdex_core::store::{DocumentStore, MetadataCache};

/// Default number of documents scanned between cooperative yields.
pub const DEFAULT_BATCH_SIZE: usize = 250;

/// Progress snapshot reported after each scan batch and once on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectProgress {
    pub processed_files: usize,
    pub total_files: usize,
}

/// Configuration for one collection run.
pub struct CollectConfig<'a> {
    /// Exact document paths to skip (the index target itself, typically).
    pub exclude_paths: HashSet<String>,
    /// Normalized folder paths whose contents are skipped.
    pub exclude_folder_paths: Vec<String>,
    /// Documents scanned between yields; values below 1 are clamped to 1.
    pub batch_size: usize,
    /// Invoked after each batch and once with the final counts.
    pub on_progress: Option<&'a mut dyn FnMut(CollectProgress)>,
}

impl Default for CollectConfig<'_> {
    fn default() -> Self {
        Self {
            exclude_paths: HashSet::new(),
            exclude_folder_paths: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            on_progress: None,
        }
    }
}

/// Result of a collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCollectResult {
    /// Deduplicated tags, lexicographically sorted.
    pub tags: Vec<String>,
    pub total_files: usize,
    pub processed_files: usize,
    pub excluded_files: usize,
    /// Notes for which cached metadata was available. Always at most
    /// `total_files - excluded_files`.
    pub files_with_cache: usize,
}

/// Collect every tag in the vault into a sorted, deduplicated list.
///
/// A note lacking cached metadata is not an error: it contributes no tags
/// and is visible only through the `files_with_cache` counter.
pub async fn collect_all_tags<S, M>(
    store: &S,
    cache: &M,
    mut config: CollectConfig<'_>,
) -> TagCollectResult
where
    S: DocumentStore + ?Sized,
    M: MetadataCache + ?Sized,
{
    let files = store.md_files();
    let total_files = files.len();
    let batch_size = config.batch_size.max(1);

    // Folder exclusions are prefix matches against `<folder>/`, so `A`
    // excludes `A/B` but never `AB`.
    let folder_prefixes: Vec<String> = config
        .exclude_folder_paths
        .iter()
        .map(|folder| format!("{}/", folder.trim_end_matches('/')))
        .filter(|prefix| prefix.len() > 1)
        .collect();

    let mut tag_set: BTreeSet<String> = BTreeSet::new();
    let mut processed_files = 0;
    let mut excluded_files = 0;
    let mut files_with_cache = 0;

    for file in &files {
        processed_files += 1;

        let excluded = config.exclude_paths.contains(&file.path)
            || folder_prefixes
                .iter()
                .any(|prefix| file.path.starts_with(prefix.as_str()));

        if excluded {
            excluded_files += 1;
        } else if let Some(meta) = cache.metadata(&file.path) {
            files_with_cache += 1;
            for tag in meta.all_tags() {
                tag_set.insert(tag);
            }
        }

        if processed_files % batch_size == 0 {
            if let Some(on_progress) = config.on_progress.as_mut() {
                on_progress(CollectProgress {
                    processed_files,
                    total_files,
                });
            }
            tokio::task::yield_now().await;
        }
    }

    if let Some(on_progress) = config.on_progress.as_mut() {
        on_progress(CollectProgress {
            processed_files,
            total_files,
        });
    }

    tracing::debug!(
        total_files,
        excluded_files,
        files_with_cache,
        tags = tag_set.len(),
        "tag collection finished"
    );

    TagCollectResult {
        tags: tag_set.into_iter().collect(),
        total_files,
        processed_files,
        excluded_files,
        files_with_cache,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{MemCache, MemStore};

    fn store_with_notes(paths: &[&str]) -> MemStore {
        let store = MemStore::new();
        for path in paths {
            store.add_file(path, "");
        }
        store
    }

    #[tokio::test]
    async fn collects_sorted_deduplicated_tags() {
        let store = store_with_notes(&["a.md", "b.md", "c.md"]);
        let mut cache = MemCache::new();
        cache.insert_tags("a.md", &["#zebra", "#alpha"]);
        cache.insert_tags("b.md", &["#alpha", "#beta"]);
        cache.insert_tags("c.md", &[]);

        let result = collect_all_tags(&store, &cache, CollectConfig::default()).await;

        assert_eq!(result.tags, vec!["#alpha", "#beta", "#zebra"]);
        assert_eq!(result.total_files, 3);
        assert_eq!(result.processed_files, 3);
        assert_eq!(result.excluded_files, 0);
        assert_eq!(result.files_with_cache, 3);
    }

    #[tokio::test]
    async fn excludes_exact_paths_and_folder_prefixes() {
        let store = store_with_notes(&[
            "Archive/Sub/Note.md",
            "ArchiveToo/Note.md",
            "Tags.md",
            "keep.md",
        ]);
        let mut cache = MemCache::new();
        for path in ["Archive/Sub/Note.md", "ArchiveToo/Note.md", "Tags.md", "keep.md"] {
            let tag = format!("#{}", path.replace(['/', '.'], "-"));
            cache.insert_tags(path, &[tag.as_str()]);
        }

        let result = collect_all_tags(
            &store,
            &cache,
            CollectConfig {
                exclude_paths: HashSet::from(["Tags.md".to_string()]),
                exclude_folder_paths: vec!["Archive".to_string()],
                ..CollectConfig::default()
            },
        )
        .await;

        assert_eq!(result.excluded_files, 2);
        assert_eq!(result.files_with_cache, 2);
        assert!(result.tags.iter().any(|t| t.contains("ArchiveToo")));
        assert!(!result.tags.iter().any(|t| t.contains("Archive-Sub")));
        assert!(!result.tags.iter().any(|t| t.contains("Tags-md")));
    }

    #[tokio::test]
    async fn folder_exclusion_tolerates_trailing_slash() {
        let store = store_with_notes(&["Archive/Note.md", "keep.md"]);
        let mut cache = MemCache::new();
        cache.insert_tags("Archive/Note.md", &["#gone"]);
        cache.insert_tags("keep.md", &["#kept"]);

        let result = collect_all_tags(
            &store,
            &cache,
            CollectConfig {
                exclude_folder_paths: vec!["Archive/".to_string()],
                ..CollectConfig::default()
            },
        )
        .await;

        assert_eq!(result.tags, vec!["#kept"]);
        assert_eq!(result.excluded_files, 1);
    }

    #[tokio::test]
    async fn missing_cache_is_counted_not_failed() {
        let store = store_with_notes(&["a.md", "b.md"]);
        let mut cache = MemCache::new();
        cache.insert_tags("a.md", &["#present"]);
        // b.md has no cache entry at all.

        let result = collect_all_tags(&store, &cache, CollectConfig::default()).await;

        assert_eq!(result.tags, vec!["#present"]);
        assert_eq!(result.files_with_cache, 1);
        assert_eq!(result.processed_files, 2);
    }

    #[tokio::test]
    async fn progress_fires_per_batch_and_once_at_the_end() {
        let store = store_with_notes(&["a.md", "b.md", "c.md", "d.md", "e.md"]);
        let cache = MemCache::new();

        let mut reports = Vec::new();
        let mut on_progress = |progress: CollectProgress| reports.push(progress);

        let result = collect_all_tags(
            &store,
            &cache,
            CollectConfig {
                batch_size: 2,
                on_progress: Some(&mut on_progress),
                ..CollectConfig::default()
            },
        )
        .await;

        let processed: Vec<usize> = reports.iter().map(|p| p.processed_files).collect();
        assert_eq!(processed, vec![2, 4, 5]);
        assert!(reports.iter().all(|p| p.total_files == 5));
        assert_eq!(result.processed_files, result.total_files);
    }

    #[tokio::test]
    async fn final_progress_fires_even_on_batch_boundary() {
        let store = store_with_notes(&["a.md", "b.md"]);
        let cache = MemCache::new();

        let mut reports = Vec::new();
        let mut on_progress = |progress: CollectProgress| reports.push(progress);

        collect_all_tags(
            &store,
            &cache,
            CollectConfig {
                batch_size: 2,
                on_progress: Some(&mut on_progress),
                ..CollectConfig::default()
            },
        )
        .await;

        let processed: Vec<usize> = reports.iter().map(|p| p.processed_files).collect();
        assert_eq!(processed, vec![2, 2]);
    }

    #[tokio::test]
    async fn batch_size_zero_is_clamped_to_one() {
        let store = store_with_notes(&["a.md", "b.md"]);
        let cache = MemCache::new();

        let mut count = 0;
        let mut on_progress = |_: CollectProgress| count += 1;

        collect_all_tags(
            &store,
            &cache,
            CollectConfig {
                batch_size: 0,
                on_progress: Some(&mut on_progress),
                ..CollectConfig::default()
            },
        )
        .await;

        // One report per document plus the final report.
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn empty_vault_reports_zero_totals() {
        let store = MemStore::new();
        let cache = MemCache::new();

        let mut reports = Vec::new();
        let mut on_progress = |progress: CollectProgress| reports.push(progress);

        let result = collect_all_tags(
            &store,
            &cache,
            CollectConfig {
                on_progress: Some(&mut on_progress),
                ..CollectConfig::default()
            },
        )
        .await;

        assert!(result.tags.is_empty());
        assert_eq!(result.total_files, 0);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].processed_files, 0);
    }
}
