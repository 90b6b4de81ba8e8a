//! anothermemory CLI
//!
//! Runs the storage conformance suite against a built-in backend.
//!
//! # Usage
//!
//! ```bash
//! # Certify the in-memory backend
//! anothermemory conformance --backend memory
//!
//! # Certify the directory backend, JSON report on stdout
//! anothermemory conformance --backend directory --data-dir /tmp/am --json
//! ```

use std::path::PathBuf;

use anothermemory::conformance::{run_storage_tests, Factories, SuiteReport};
use anothermemory::constants::{APP_NAME, CONFORMANCE_RUN_DIR_PREFIX, DATA_DIR_DEFAULT};
use anothermemory::storage::{open_storage, DirectoryStorage, MemoryStorage, Storage};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

// =============================================================================
// CLI
// =============================================================================

/// Unit storage tooling
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Unit storage backends and their conformance suite")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the storage conformance suite
    Conformance {
        /// Backend to certify
        #[arg(long, value_enum, default_value_t = Backend::Memory)]
        backend: Backend,

        /// Data directory for file-based backends
        #[arg(long, default_value = DATA_DIR_DEFAULT)]
        data_dir: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// In-process storage (config round-trip is skipped)
    Memory,
    /// One JSON file per unit under the data directory
    Directory,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging (stderr, stdout carries the report)
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Conformance {
            backend,
            data_dir,
            json,
        } => {
            let report = match backend {
                Backend::Memory => certify_memory().await,
                Backend::Directory => certify_directory(&data_dir).await?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }

            if !report.is_success() {
                anyhow::bail!("{} scenario(s) failed", report.counts().failed);
            }
        }
    }

    Ok(())
}

async fn certify_memory() -> SuiteReport {
    let factories = Factories::new(|| Box::new(MemoryStorage::new()) as Box<dyn Storage>);
    run_storage_tests("memory", factories).await
}

async fn certify_directory(data_dir: &str) -> anyhow::Result<SuiteReport> {
    // Every instance gets its own root inside a per-run scratch directory
    let data_dir = shellexpand::tilde(data_dir).to_string();
    let run_dir = PathBuf::from(data_dir).join(format!(
        "{}{}",
        CONFORMANCE_RUN_DIR_PREFIX,
        Uuid::new_v4()
    ));
    tokio::fs::create_dir_all(&run_dir).await?;
    tracing::info!("Run directory: {}", run_dir.display());

    let root = run_dir.clone();
    let factories = Factories::new(move || {
        Box::new(DirectoryStorage::new(root.join(Uuid::new_v4().to_string()))) as Box<dyn Storage>
    })
    .with_load_from_config(open_storage);

    let report = run_storage_tests("directory", factories).await;

    tokio::fs::remove_dir_all(&run_dir).await?;
    Ok(report)
}
