//! The create/modify/skip decision for the index document.
//!
//! A write either fully replaces the document or does not happen at all.
//! Equality against the existing content is checked under the timestamp
//! mask from [`tagdex_core::format`], so a rebuild that found the same tags
//! leaves the file untouched.

use tagdex_core::error::{Result, TagdexError};
use tagdex_core::format::content_matches_ignoring_timestamp;
use tagdex_core::store::{DocumentStore, VaultEntry};

/// The action the writer actually performed. Purely a return value, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Modified,
    Skipped,
}

/// Create, overwrite, or skip the document at `path`.
///
/// Missing parent folders are created segment by segment before a create.
///
/// # Errors
///
/// Returns [`TagdexError::PathConflict`] when a file occupies an ancestor
/// segment, [`TagdexError::NotAFile`] when `path` resolves to a folder, and
/// propagates storage failures.
pub async fn write_index_file<S>(store: &S, path: &str, content: &str) -> Result<WriteOutcome>
where
    S: DocumentStore + ?Sized,
{
    match store.entry_at(path) {
        None => {
            ensure_parent_folders(store, path).await?;
            store.create(path, content).await?;
            tracing::debug!(path, "created tag index");
            Ok(WriteOutcome::Created)
        }
        Some(VaultEntry::Folder) => Err(TagdexError::NotAFile {
            path: path.to_string(),
        }),
        Some(VaultEntry::File) => {
            let existing = store.read(path).await?;
            if content_matches_ignoring_timestamp(&existing, content) {
                tracing::debug!(path, "tag index unchanged, skipping write");
                Ok(WriteOutcome::Skipped)
            } else {
                store.modify(path, content).await?;
                tracing::debug!(path, "tag index rewritten");
                Ok(WriteOutcome::Modified)
            }
        }
    }
}

/// Walk the ancestor chain of `path`, creating any missing folder.
async fn ensure_parent_folders<S>(store: &S, path: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    let Some((parents, _basename)) = path.rsplit_once('/') else {
        return Ok(());
    };

    let mut ancestor = String::new();
    for segment in parents.split('/') {
        if !ancestor.is_empty() {
            ancestor.push('/');
        }
        ancestor.push_str(segment);

        match store.entry_at(&ancestor) {
            None => store.create_folder(&ancestor).await?,
            Some(VaultEntry::Folder) => {}
            Some(VaultEntry::File) => {
                return Err(TagdexError::PathConflict { path: ancestor });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemStore;

    #[tokio::test]
    async fn creates_missing_file_with_parent_chain() {
        let store = MemStore::new();
        let outcome = write_index_file(&store, "Meta/Index/Tags.md", "content")
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Created);
        assert!(store.folder_exists("Meta"));
        assert!(store.folder_exists("Meta/Index"));
        assert_eq!(
            store.content("Meta/Index/Tags.md").as_deref(),
            Some("content")
        );
    }

    #[tokio::test]
    async fn creates_top_level_file_without_folders() {
        let store = MemStore::new();
        let outcome = write_index_file(&store, "Tags.md", "content").await.unwrap();
        assert_eq!(outcome, WriteOutcome::Created);
    }

    #[tokio::test]
    async fn reuses_existing_parent_folders() {
        let store = MemStore::new();
        store.add_folder("Meta");
        let outcome = write_index_file(&store, "Meta/Tags.md", "content")
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Created);
    }

    #[tokio::test]
    async fn fails_when_a_file_blocks_an_ancestor() {
        let store = MemStore::new();
        store.add_file("Meta", "I am a file");

        let err = write_index_file(&store, "Meta/Tags.md", "content")
            .await
            .unwrap_err();
        assert!(matches!(err, TagdexError::PathConflict { path } if path == "Meta"));
        assert!(store.content("Meta/Tags.md").is_none());
    }

    #[tokio::test]
    async fn fails_when_target_is_a_folder() {
        let store = MemStore::new();
        store.add_folder("Tags.md");

        let err = write_index_file(&store, "Tags.md", "content").await.unwrap_err();
        assert!(matches!(err, TagdexError::NotAFile { .. }));
    }

    #[tokio::test]
    async fn skips_when_content_matches_under_the_mask() {
        let store = MemStore::new();
        store.add_file(
            "Tags.md",
            "# Tag Index\n\nLast updated: 01/01/2026, 09:00 AM\n\n- #x\n",
        );

        let outcome = write_index_file(
            &store,
            "Tags.md",
            "# Tag Index\n\nLast updated: 06/06/2026, 11:45 PM\n\n- #x\n",
        )
        .await
        .unwrap();

        assert_eq!(outcome, WriteOutcome::Skipped);
        // The old timestamp is still in place: no write happened.
        assert!(store
            .content("Tags.md")
            .unwrap()
            .contains("01/01/2026"));
    }

    #[tokio::test]
    async fn modifies_when_tags_differ() {
        let store = MemStore::new();
        store.add_file(
            "Tags.md",
            "# Tag Index\n\nLast updated: 01/01/2026, 09:00 AM\n\n- #x\n",
        );

        let outcome = write_index_file(
            &store,
            "Tags.md",
            "# Tag Index\n\nLast updated: 06/06/2026, 11:45 PM\n\n- #y\n",
        )
        .await
        .unwrap();

        assert_eq!(outcome, WriteOutcome::Modified);
        assert!(store.content("Tags.md").unwrap().contains("- #y"));
    }
}
