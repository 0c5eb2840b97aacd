// Configuration loading and parsing (balancer.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::balance::BalanceOptions;

/// File name shared by `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "balancer.toml";

/// Upper bound accepted for `balance.goalkeepers_per_team`.
pub const MAX_GOALKEEPERS_PER_TEAM: usize = 5;

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
// balancer.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub balance: BalanceSection,
    pub game: GameSection,
    pub data_paths: DataPaths,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceSection {
    #[serde(default = "default_goalkeepers_per_team")]
    pub goalkeepers_per_team: usize,
    #[serde(default = "default_consider_positions")]
    pub consider_positions: bool,
}

fn default_goalkeepers_per_team() -> usize {
    BalanceOptions::default().goalkeepers_per_team
}

fn default_consider_positions() -> bool {
    BalanceOptions::default().consider_positions
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameSection {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster: String,
    /// Optional pairs file. A missing file on disk means "no pairs".
    #[serde(default)]
    pub pairs: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    pub format: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        OutputSection {
            format: OutputFormat::Json.as_str().to_string(),
        }
    }
}

/// How the binary prints the balancing report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}

impl OutputFormat {
    pub fn from_str_format(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        }
    }
}

impl Config {
    /// Engine options from the `[balance]` section.
    pub fn balance_options(&self) -> BalanceOptions {
        BalanceOptions {
            goalkeepers_per_team: self.balance.goalkeepers_per_team,
            consider_positions: self.balance.consider_positions,
        }
    }

    /// Output format; validated on load, so unknown values fall back to JSON.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str_format(&self.output.format).unwrap_or(OutputFormat::Json)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/balancer.toml` relative to
/// `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/balancer.toml` into `config/` when no config exists yet.
///
/// Returns the path written, or `None` when `config/balancer.toml` was
/// already there. An existing config is never touched.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} and no defaults/{CONFIG_FILE} under {}",
                base_dir.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;

    info!("Created {} from shipped defaults", target.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, creating it from
/// defaults on first run.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.game.id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "game.id".into(),
            message: "must not be empty".into(),
        });
    }

    if config.data_paths.roster.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.roster".into(),
            message: "must not be empty".into(),
        });
    }

    if OutputFormat::from_str_format(&config.output.format).is_none() {
        return Err(ConfigError::ValidationError {
            field: "output.format".into(),
            message: format!("must be \"json\" or \"summary\", got {:?}", config.output.format),
        });
    }

    let gk = config.balance.goalkeepers_per_team;
    if gk > MAX_GOALKEEPERS_PER_TEAM {
        return Err(ConfigError::ValidationError {
            field: "balance.goalkeepers_per_team".into(),
            message: format!("must be at most {MAX_GOALKEEPERS_PER_TEAM}, got {gk}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
