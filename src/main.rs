use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use recall::commands::{self, Commands};
use recall::output::{ErrorResponse, print_json};
use recall::{Config, MemoryStore, create_embedder};

/// recall - A bounded semantic memory store
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit structured JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Override the snapshot path from config
    #[arg(long, global = true, value_name = "PATH")]
    snapshot: Option<std::path::PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Diagnostics go to stderr so --json output on stdout stays parseable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                print_json(&ErrorResponse {
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, recall::Error> {
    let mut config = Config::load()?;
    if let Some(snapshot) = &cli.snapshot {
        config.snapshot_path = snapshot.clone();
    }

    let embedder = create_embedder(&config)?;
    let mut store = MemoryStore::new(embedder, config.capacity);

    // Startup load fails soft: an unusable snapshot means an empty store,
    // never a dead CLI.
    if let Err(e) = store.load(&config.snapshot_path) {
        tracing::warn!(error = %e, "snapshot load failed, starting with empty memory");
    }

    commands::execute(&cli.command, &mut store, &config, cli.json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::parse_from(["recall", "add", "deploy the app"]);
        assert!(matches!(cli.command, Commands::Add { .. }));
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parses_search_with_k() {
        let cli = Cli::parse_from(["recall", "search", "deploy", "-k", "5"]);
        match cli.command {
            Commands::Search { query, k } => {
                assert_eq!(query, "deploy");
                assert_eq!(k, 5);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_cli_search_default_k() {
        let cli = Cli::parse_from(["recall", "search", "deploy"]);
        match cli.command {
            Commands::Search { k, .. } => assert_eq!(k, 3),
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["recall", "stats", "--json", "--snapshot", "/tmp/m.json"]);
        assert!(cli.json);
        assert_eq!(cli.snapshot, Some(std::path::PathBuf::from("/tmp/m.json")));
    }
}
