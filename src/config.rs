//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\movie-minder\config.toml
//! - macOS: ~/Library/Application Support/movie-minder/config.toml
//! - Linux: ~/.config/movie-minder/config.toml
//!
//! Every field has a default, so a partial file (or none at all) is fine.
//! CLI flags override whatever the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enrichment::EnrichmentConfig;
use crate::enrichment::omdb::DEFAULT_BASE_URL;
use crate::source::SourcePaths;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Input CSV locations
    pub sources: SourcesConfig,

    /// Database settings
    pub database: DatabaseConfig,

    /// External API settings
    pub api: ApiConfig,

    /// Diagnostic report settings
    pub report: ReportConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// OMDb API key (get one at https://www.omdbapi.com/apikey.aspx)
    pub omdb_api_key: Option<String>,
}

/// Input CSV locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub movies_csv: PathBuf,
    pub ratings_csv: PathBuf,
    /// Optional; without it the IMDb ID fallback is unavailable
    pub links_csv: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            movies_csv: PathBuf::from("data/movies.csv"),
            ratings_csv: PathBuf::from("data/ratings.csv"),
            links_csv: PathBuf::from("data/links.csv"),
        }
    }
}

impl SourcesConfig {
    pub fn paths(&self) -> SourcePaths {
        SourcePaths {
            movies: self.movies_csv.clone(),
            ratings: self.ratings_csv.clone(),
            links: self.links_csv.clone(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::db::DEFAULT_DB_NAME),
        }
    }
}

/// External API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-call timeout
    pub timeout_secs: u64,
    /// Pause after each record
    pub call_delay_ms: u64,
    /// Pause before each fallback strategy
    pub retry_delay_ms: u64,
    /// Records sent through the strategy chain per run (0 = all)
    pub request_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            call_delay_ms: 200,
            retry_delay_ms: 100,
            request_limit: 400,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn enrichment_config(&self) -> EnrichmentConfig {
        EnrichmentConfig {
            call_delay: Duration::from_millis(self.call_delay_ms),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            request_limit: (self.request_limit > 0).then_some(self.request_limit),
        }
    }
}

/// Diagnostic report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where unmatched movies are written
    pub missing_movies_csv: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            missing_movies_csv: PathBuf::from("logs/missing_movies.csv"),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("movie-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, falling back to defaults
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to a file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
