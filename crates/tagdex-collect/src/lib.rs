//! # tagdex-collect
//!
//! The incremental collection pipeline:
//! - [`collector`] — batched, cooperatively yielding tag collection with
//!   progress reporting
//! - [`writer`] — the create/modify/skip decision for the index document
//! - [`update`] — the orchestrator wiring resolution, collection,
//!   formatting, and the write into one guarded run

pub mod collector;
pub mod update;
pub mod writer;

pub use collector::{collect_all_tags, CollectConfig, CollectProgress, TagCollectResult};
pub use update::{IndexUpdater, UpdateSummary};
pub use writer::{write_index_file, WriteOutcome};

#[cfg(test)]
pub(crate) mod fakes;
