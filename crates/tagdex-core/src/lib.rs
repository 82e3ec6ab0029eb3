//! # tagdex-core
//!
//! Core types for the Tagdex tag index builder.
//!
//! This crate defines the foundational pieces used across all other Tagdex
//! crates:
//! - Path resolution for the index target and exclusion folders ([`paths`])
//! - Index document rendering and the volatile-line mask ([`format`])
//! - Persisted configuration ([`Settings`])
//! - Capability interfaces for the document store, metadata cache, and
//!   notification surface ([`store`])
//! - Error hierarchy ([`TagdexError`], [`PathError`])

pub mod error;
pub mod format;
pub mod paths;
pub mod settings;
pub mod store;

pub use error::{PathError, Result, TagdexError};
pub use paths::{normalize_vault_folder_path, resolve_target_file_path, ResolvedTargetPath};
pub use settings::Settings;
pub use store::{DocumentStore, MetadataCache, NoteFile, NoteMetadata, Notifier, VaultEntry};
