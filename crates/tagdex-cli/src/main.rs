//! Tagdex CLI — aggregated tag index builder for markdown vaults
//!
//! Commands: update, watch, config, completions

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use tagdex_collect::update::IndexUpdater;
use tagdex_core::error::TagdexError;
use tagdex_core::paths::{normalize_vault_folder_path, resolve_target_file_path};
use tagdex_core::settings::{Settings, DEFAULT_TARGET_FILE_PATH};
use tagdex_core::store::Notifier;
use tagdex_vault::{FsVault, MetadataIndex, VaultWatcher};

#[derive(Parser)]
#[command(name = "tagdex")]
#[command(version)]
#[command(about = "Aggregated tag index builder for markdown vaults")]
struct Cli {
    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rebuild the tag index once
    #[command(alias = "u")]
    Update {
        /// Override the configured target file path for this run
        #[arg(long)]
        target: Option<String>,
    },
    /// Watch the vault and rebuild the index on changes
    Watch {
        /// Quiet period after a change before rebuilding, in milliseconds
        #[arg(long, default_value_t = 500)]
        debounce_ms: u64,
    },
    /// Inspect or change the stored configuration
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the stored settings and the resolved target path
    Show,
    /// Set the target index file path
    SetTarget { path: String },
    /// Manage excluded folders
    #[command(subcommand)]
    Exclude(ExcludeCommands),
}

#[derive(clap::Subcommand)]
enum ExcludeCommands {
    /// Exclude a folder from scanning
    Add { folder: String },
    /// Remove a folder from the exclusion list
    Remove { folder: String },
    /// List excluded folders
    List,
}

/// Transient progress messages go to stderr; only results go to stdout.
struct TermNotifier;

impl Notifier for TermNotifier {
    fn set_message(&self, message: &str) {
        eprintln!("{message}");
    }

    fn hide(&self) {}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Update { target } => run_update(&cli.vault, target).await,
        Commands::Watch { debounce_ms } => {
            run_watch(&cli.vault, Duration::from_millis(debounce_ms)).await
        }
        Commands::Config(command) => run_config(&cli.vault, command),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tagdex", &mut io::stdout());
            Ok(())
        }
    }
}

async fn run_update(vault_root: &Path, target: Option<String>) -> anyhow::Result<()> {
    let mut settings = Settings::load(vault_root);
    if let Some(target) = target {
        settings.target_file_path = target;
    }

    match run_update_cycle(vault_root, &settings).await {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => bail!("Failed to update tag index: {err}"),
    }
}

/// One full build: fresh vault snapshot, fresh metadata scan, one update run.
async fn run_update_cycle(vault_root: &Path, settings: &Settings) -> anyhow::Result<String> {
    let vault = FsVault::open(vault_root).context("open vault")?;
    let cache = MetadataIndex::build(&vault).await;
    let updater = IndexUpdater::new(vault, cache, TermNotifier, settings.clone());
    let summary = updater.run().await?;
    Ok(summary.message())
}

async fn run_watch(vault_root: &Path, debounce: Duration) -> anyhow::Result<()> {
    let settings = Settings::load(vault_root);
    let target = resolve_target_file_path(&settings.target_file_path, DEFAULT_TARGET_FILE_PATH)
        .map_err(TagdexError::from)?;

    let watcher = VaultWatcher::start(vault_root, Some(target.path.clone()))?;
    tracing::info!(vault = %vault_root.display(), target = %target.path, "watching for changes");

    // Initial build so the index reflects the vault before the first change.
    match run_update_cycle(vault_root, &settings).await {
        Ok(message) => println!("{message}"),
        Err(err) => tracing::error!(error = %err, "initial build failed"),
    }

    loop {
        let Some(change) = watcher.recv_timeout(Duration::from_millis(200)) else {
            continue;
        };
        tracing::debug!(?change, "vault changed");

        // Let a burst of events settle before rebuilding.
        while watcher.recv_timeout(debounce).is_some() {}

        match run_update_cycle(vault_root, &settings).await {
            Ok(message) => println!("{message}"),
            Err(err) => tracing::error!(error = %err, "rebuild failed"),
        }
    }
}

fn run_config(vault_root: &Path, command: ConfigCommands) -> anyhow::Result<()> {
    let mut settings = Settings::load(vault_root);

    match command {
        ConfigCommands::Show => {
            println!("target_file_path: {}", settings.target_file_path);
            match resolve_target_file_path(&settings.target_file_path, DEFAULT_TARGET_FILE_PATH) {
                Ok(resolved) => println!("resolved: {}", resolved.path),
                Err(err) => println!("resolved: INVALID ({err})"),
            }
            if settings.excluded_folder_paths.is_empty() {
                println!("excluded folders: (none)");
            } else {
                println!("excluded folders:");
                for folder in &settings.excluded_folder_paths {
                    println!("  - {folder}");
                }
            }
        }
        ConfigCommands::SetTarget { path } => {
            let resolved = match resolve_target_file_path(&path, DEFAULT_TARGET_FILE_PATH) {
                Ok(resolved) => resolved,
                Err(err) => bail!("invalid target file path: {err}"),
            };
            settings.target_file_path = path;
            settings.save(vault_root)?;
            let note = if resolved.did_append_md {
                " (.md appended)"
            } else {
                ""
            };
            println!("Target file path set to '{}'{note}.", resolved.path);
        }
        ConfigCommands::Exclude(ExcludeCommands::Add { folder }) => {
            let Some(normalized) = normalize_vault_folder_path(&folder) else {
                bail!("'{folder}' is not a valid vault folder path");
            };
            if settings.covers_folder(&normalized) {
                bail!("'{normalized}' is already excluded");
            }
            settings.excluded_folder_paths.push(normalized.clone());
            settings.save(vault_root)?;
            println!("Excluded '{normalized}'.");
        }
        ConfigCommands::Exclude(ExcludeCommands::Remove { folder }) => {
            let Some(normalized) = normalize_vault_folder_path(&folder) else {
                bail!("'{folder}' is not a valid vault folder path");
            };
            let before = settings.excluded_folder_paths.len();
            settings
                .excluded_folder_paths
                .retain(|existing| {
                    normalize_vault_folder_path(existing).as_deref() != Some(normalized.as_str())
                });
            if settings.excluded_folder_paths.len() == before {
                bail!("'{normalized}' is not in the exclusion list");
            }
            settings.save(vault_root)?;
            println!("Removed '{normalized}' from the exclusion list.");
        }
        ConfigCommands::Exclude(ExcludeCommands::List) => {
            for folder in &settings.excluded_folder_paths {
                println!("{folder}");
            }
        }
    }

    Ok(())
}
