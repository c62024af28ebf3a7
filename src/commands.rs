//! Command handlers for the recall CLI.
//!
//! The CLI is the store's serving layer: each invocation constructs the
//! store, loads the snapshot, runs one command, and saves back after a
//! mutation. A missing or unusable snapshot degrades to an empty store
//! rather than failing the command.

use std::process::ExitCode;

use crate::config::Config;
use crate::errors::Error;
use crate::memory::{AddOutcome, MemoryStore};
use crate::output::*;

/// Commands supported by the recall CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a text record to memory
    Add {
        /// Memory text content
        text: String,
    },
    /// Search memory for records relevant to a query
    Search {
        /// Search query text
        query: String,

        /// Maximum number of results (default: 3)
        #[arg(short, long, default_value = "3")]
        k: usize,
    },
    /// Remove all records from memory
    Clear,
    /// Show record count and store configuration
    Stats,
}

/// Execute a CLI command.
pub fn execute(
    command: &Commands,
    store: &mut MemoryStore,
    config: &Config,
    json: bool,
) -> Result<ExitCode, Error> {
    match command {
        Commands::Add { text } => handle_add(store, config, text, json),
        Commands::Search { query, k } => handle_search(store, query, *k, json),
        Commands::Clear => handle_clear(store, config, json),
        Commands::Stats => handle_stats(store, config, json),
    }
}

fn persist(store: &MemoryStore, config: &Config) -> Result<(), Error> {
    config.ensure_directories()?;
    store.save(&config.snapshot_path)
}

fn handle_add(
    store: &mut MemoryStore,
    config: &Config,
    text: &str,
    json: bool,
) -> Result<ExitCode, Error> {
    match store.add(text) {
        AddOutcome::Added { position, evicted } => {
            persist(store, config)?;
            if json {
                print_json(&AddResponse {
                    status: "added".to_string(),
                    position: Some(position),
                    evicted,
                    size: store.len(),
                });
            } else {
                println!("Added memory at position {} ({} stored)", position, store.len());
                if evicted {
                    println!("Oldest memory evicted to stay within capacity");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        AddOutcome::Skipped => {
            if json {
                print_json(&AddResponse {
                    status: "skipped".to_string(),
                    position: None,
                    evicted: false,
                    size: store.len(),
                });
            } else {
                println!("Skipped: text was empty or whitespace-only");
            }
            Ok(ExitCode::from(2))
        }
    }
}

fn handle_search(
    store: &MemoryStore,
    query: &str,
    k: usize,
    json: bool,
) -> Result<ExitCode, Error> {
    let results = store.search(query, k);
    if json {
        print_json(&SearchResponse { results });
    } else if results.is_empty() {
        println!("No relevant memory found");
    } else {
        for (rank, result) in results.iter().enumerate() {
            println!("{}. {}", rank + 1, result);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_clear(
    store: &mut MemoryStore,
    config: &Config,
    json: bool,
) -> Result<ExitCode, Error> {
    store.clear();
    persist(store, config)?;
    if json {
        print_json(&ClearResponse {
            status: "cleared".to_string(),
        });
    } else {
        println!("Memory cleared");
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_stats(
    store: &MemoryStore,
    config: &Config,
    json: bool,
) -> Result<ExitCode, Error> {
    if json {
        print_json(&StatsResponse {
            records: store.len(),
            capacity: store.capacity(),
            embedding_provider: config.embedding_provider.clone(),
            snapshot_path: config.snapshot_path.display().to_string(),
        });
    } else {
        println!("Records: {} / {}", store.len(), store.capacity());
        println!("Embedding provider: {}", config.embedding_provider);
        println!("Snapshot: {}", config.snapshot_path.display());
    }
    Ok(ExitCode::SUCCESS)
}
