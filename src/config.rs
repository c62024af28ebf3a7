//! Configuration system for recall.
//!
//! Values are resolved with priority: defaults < config file < env vars.
//! The config file lives at `<config_dir>/recall/config.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::Error;

/// Embedding providers accepted by `embedding_provider`.
const KNOWN_PROVIDERS: &[&str] = &["byte", "onnx"];

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the persisted memory snapshot.
    #[serde(default)]
    pub snapshot_path: PathBuf,

    /// Maximum number of records retained before FIFO eviction.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Embedding vector dimensionality.
    #[serde(default = "default_dims")]
    pub embedding_dims: usize,

    /// Embedding provider: "byte" (deterministic byte projection) or
    /// "onnx" (sentence-embedding model).
    #[serde(default)]
    pub embedding_provider: String,

    /// HuggingFace embedding model identifier (used by the "onnx" provider).
    #[serde(default)]
    pub embedding_model: String,
}

fn default_capacity() -> usize {
    crate::memory::store::DEFAULT_CAPACITY
}

fn default_dims() -> usize {
    crate::embedding::EMBEDDING_DIMS
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        let recall_dir = home.join(".recall");

        Self {
            snapshot_path: recall_dir.join("memory.json"),
            capacity: default_capacity(),
            embedding_dims: default_dims(),
            embedding_provider: "byte".to_string(),
            embedding_model: "BAAI/bge-small-en-v1.5".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with defaults, file values, and environment overrides.
    pub fn load() -> Result<Self, Error> {
        let mut config = Config::default();

        if let Some(file) = load_from_file()? {
            config.merge_from_file(file);
        }
        expand_tilde(&mut config.snapshot_path);

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if !file.snapshot_path.as_os_str().is_empty() {
            self.snapshot_path = file.snapshot_path;
        }
        if let Some(capacity) = file.capacity {
            self.capacity = capacity;
        }
        if let Some(dims) = file.embedding_dims {
            self.embedding_dims = dims;
        }
        if !file.embedding_provider.is_empty() {
            self.embedding_provider = file.embedding_provider;
        }
        if !file.embedding_model.is_empty() {
            self.embedding_model = file.embedding_model;
        }
    }

    /// Apply `RECALL_*` environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), Error> {
        if let Ok(value) = std::env::var("RECALL_SNAPSHOT_PATH") {
            let mut path = PathBuf::from(value);
            expand_tilde(&mut path);
            self.snapshot_path = path;
        }
        if let Ok(value) = std::env::var("RECALL_CAPACITY") {
            self.capacity = value.parse().map_err(|_| {
                Error::Config(format!("RECALL_CAPACITY must be a positive integer, got '{value}'"))
            })?;
        }
        if let Ok(value) = std::env::var("RECALL_EMBEDDING_DIMS") {
            self.embedding_dims = value.parse().map_err(|_| {
                Error::Config(format!(
                    "RECALL_EMBEDDING_DIMS must be a positive integer, got '{value}'"
                ))
            })?;
        }
        if let Ok(value) = std::env::var("RECALL_EMBEDDING_PROVIDER") {
            self.embedding_provider = value;
        }
        if let Ok(value) = std::env::var("RECALL_EMBEDDING_MODEL") {
            self.embedding_model = value;
        }
        Ok(())
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), Error> {
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(Error::Config("snapshot_path must not be empty".to_string()));
        }
        if self.capacity == 0 {
            return Err(Error::Config("capacity must be at least 1".to_string()));
        }
        if self.embedding_dims == 0 {
            return Err(Error::Config("embedding_dims must be at least 1".to_string()));
        }
        if !KNOWN_PROVIDERS.contains(&self.embedding_provider.as_str()) {
            return Err(Error::Config(format!(
                "unknown embedding provider '{}'. Supported: {}",
                self.embedding_provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }
        if self.embedding_provider == "onnx" && self.embedding_model.trim().is_empty() {
            return Err(Error::Config(
                "embedding_model must be set when embedding_provider is 'onnx'".to_string(),
            ));
        }
        Ok(())
    }

    /// Ensure the snapshot's parent directory exists.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        if let Some(parent) = self.snapshot_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Configuration loaded from TOML file.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub snapshot_path: PathBuf,

    #[serde(default)]
    pub capacity: Option<usize>,

    #[serde(default)]
    pub embedding_dims: Option<usize>,

    #[serde(default)]
    pub embedding_provider: String,

    #[serde(default)]
    pub embedding_model: String,
}

/// Load configuration from TOML file.
fn load_from_file() -> Result<Option<ConfigFile>, Error> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));

    let config_path = config_dir.join("recall/config.toml");

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {e}",
                config_path.display()
            ))
        })?;

        let config: ConfigFile = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {e}",
                config_path.display()
            ))
        })?;

        Ok(Some(config))
    } else {
        Ok(None)
    }
}

/// Expand `~` to home directory in a PathBuf (in-place).
fn expand_tilde(path: &mut PathBuf) {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            let rest = path.strip_prefix("~").unwrap_or(Path::new(""));
            *path = home.join(rest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that mutate process-wide environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn cleanup_env_vars() {
        let vars = [
            "RECALL_SNAPSHOT_PATH",
            "RECALL_CAPACITY",
            "RECALL_EMBEDDING_DIMS",
            "RECALL_EMBEDDING_PROVIDER",
            "RECALL_EMBEDDING_MODEL",
        ];
        for var in vars {
            unsafe { std::env::remove_var(var) };
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.capacity, 200);
        assert_eq!(config.embedding_dims, 384);
        assert_eq!(config.embedding_provider, "byte");
        assert!(config.snapshot_path.ends_with(".recall/memory.json"));
    }

    #[test]
    fn test_env_var_overrides_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        unsafe {
            std::env::set_var("RECALL_SNAPSHOT_PATH", "/custom/path/memory.json");
            std::env::set_var("RECALL_CAPACITY", "50");
            std::env::set_var("RECALL_EMBEDDING_DIMS", "16");
            std::env::set_var("RECALL_EMBEDDING_PROVIDER", "onnx");
            std::env::set_var("RECALL_EMBEDDING_MODEL", "env/model");
        }

        let mut config = Config::default();
        config.apply_env_overrides().unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("/custom/path/memory.json"));
        assert_eq!(config.capacity, 50);
        assert_eq!(config.embedding_dims, 16);
        assert_eq!(config.embedding_provider, "onnx");
        assert_eq!(config.embedding_model, "env/model");

        cleanup_env_vars();
    }

    #[test]
    fn test_invalid_capacity_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();

        unsafe { std::env::set_var("RECALL_CAPACITY", "not-a-number") };

        let mut config = Config::default();
        let result = config.apply_env_overrides();
        assert!(matches!(result, Err(Error::Config(_))));

        cleanup_env_vars();
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = Config {
            capacity: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let config = Config {
            embedding_provider: "magic".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_toml() {
        let content = r#"
This is not valid TOML
 [[unclosed bracket
 "#;

        let result: Result<ConfigFile, _> = toml::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_config_file() {
        let result: Result<ConfigFile, _> = toml::from_str("");
        assert!(result.is_ok());

        let file = result.unwrap();
        assert!(file.snapshot_path.as_os_str().is_empty());
        assert!(file.capacity.is_none());
        assert!(file.embedding_provider.is_empty());
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let content = r#"
            capacity = 25
        "#;

        let file: ConfigFile = toml::from_str(content).unwrap();
        let mut config = Config::default();
        config.merge_from_file(file);

        assert_eq!(config.capacity, 25);
        assert_eq!(config.embedding_dims, 384);
        assert_eq!(config.embedding_provider, "byte");
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap_or_default();
        if home.as_os_str().is_empty() {
            return;
        }
        let mut path = PathBuf::from("~/test/path");
        expand_tilde(&mut path);

        assert!(!path.starts_with("~"));
        assert!(path.starts_with(&home));
        assert!(path.ends_with("test/path"));
    }

    #[test]
    fn test_expand_tilde_no_tilde() {
        let mut path = PathBuf::from("/absolute/path");
        let original = path.clone();

        expand_tilde(&mut path);

        assert_eq!(path, original);
    }
}
