// Configuration loading and parsing (sources.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const SOURCES_FILE: &str = "sources.toml";

/// Upper bound on configured retries; anything higher is a typo.
const MAX_RETRIES: u32 = 10;

/// Upper bound on the flat retry delay.
const MAX_RETRY_DELAY_MS: u64 = 60_000;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
}

/// Raw deserialization target for sources.toml.
#[derive(Debug, Clone, Deserialize)]
struct SourcesFile {
    sources: SourcesConfig,
    #[serde(default)]
    fetch: FetchConfig,
}

/// URLs of the four CSV files.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub home: String,
    pub away: String,
    pub overall: String,
    pub league_averages: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl FetchConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/sources.toml` relative to
/// the given `base_dir`.
///
/// This does not copy defaults; prefer `load_config()` which does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(SOURCES_FILE);
    let text = read_file(&path)?;
    let file: SourcesFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        sources: file.sources,
        fetch: file.fetch,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/sources.toml` to `config/sources.toml` unless the user
/// already has one. Returns the paths written; empty when nothing was copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let default_file = base_dir.join("defaults").join(SOURCES_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(SOURCES_FILE);

    if target.exists() {
        return Ok(Vec::new());
    }
    if !default_file.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "{} is missing and there is no default at {}",
                target.display(),
                default_file.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!(
            "copying {} to {}: {e}",
            default_file.display(),
            target.display()
        ),
    };
    std::fs::create_dir_all(&config_dir).map_err(&copy_err)?;
    std::fs::copy(&default_file, &target).map_err(&copy_err)?;
    info!(path = %target.display(), "created config from defaults");

    Ok(vec![target])
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let s = &config.sources;
    let url_fields: &[(&str, &str)] = &[
        ("sources.home", s.home.as_str()),
        ("sources.away", s.away.as_str()),
        ("sources.overall", s.overall.as_str()),
        ("sources.league_averages", s.league_averages.as_str()),
    ];
    for (name, url) in url_fields {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be an http(s) URL, got {url}"),
            });
        }
    }

    if config.fetch.retries > MAX_RETRIES {
        return Err(ConfigError::ValidationError {
            field: "fetch.retries".into(),
            message: format!("must be at most {MAX_RETRIES}, got {}", config.fetch.retries),
        });
    }

    if config.fetch.retry_delay_ms > MAX_RETRY_DELAY_MS {
        return Err(ConfigError::ValidationError {
            field: "fetch.retry_delay_ms".into(),
            message: format!(
                "must be at most {MAX_RETRY_DELAY_MS}, got {}",
                config.fetch.retry_delay_ms
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
