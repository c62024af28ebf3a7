//! JSON response types and formatting for CLI output.

use serde::Serialize;

/// Response for successful memory addition.
#[derive(Serialize)]
pub struct AddResponse {
    pub status: String,
    pub position: Option<usize>,
    pub evicted: bool,
    pub size: usize,
}

/// Response for search results.
#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<String>,
}

/// Response for clearing the store.
#[derive(Serialize)]
pub struct ClearResponse {
    pub status: String,
}

/// Response for store statistics.
#[derive(Serialize)]
pub struct StatsResponse {
    pub records: usize,
    pub capacity: usize,
    pub embedding_provider: String,
    pub snapshot_path: String,
}

/// Response for errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}
