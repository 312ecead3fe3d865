//! Configuration management using the prefer crate for discovery.
//!
//! Precedence, highest first: command-line flags, `LOCHGUIDE_*` / `LLM_*`
//! environment variables, the config file, built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;

/// Region named in prompts when none is configured.
pub const DEFAULT_REGION: &str = "Loch Ness, Scotland";

/// Address the server binds to when none is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Data directory, relative to the working directory, when none is configured.
const DEFAULT_DATA_DIR: &str = "data";

/// Name prefer searches for (`lochguide.toml`, `lochguide.yaml`, ...).
const CONFIG_NAME: &str = "lochguide";

/// Errors raised while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding campsites.json, trails.json, extras.json and faq.json.
    pub data_dir: PathBuf,
    /// Region named in prompts.
    pub region: String,
    /// Server bind address.
    pub bind: String,
    /// Completion service settings.
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_DATA_DIR),
            region: DEFAULT_REGION.to_string(),
            bind: DEFAULT_BIND.to_string(),
            llm: LlmConfig::default(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Region named in prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Server bind address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Completion service configuration.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover a config file with prefer, falling back to defaults.
    ///
    /// A discovered file that fails to parse is reported and ignored.
    pub async fn load() -> Self {
        let discovered = match prefer::load(CONFIG_NAME).await {
            Ok(found) => found.source_path().map(|p| p.to_path_buf()),
            Err(_) => None,
        };

        match discovered {
            Some(path) => match Self::load_from_path(&path).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring config: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        // Environment beats the file.
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_error("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_error("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error("JSON", e.to_string())),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// Paths starting with ~ are expanded.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref region) = self.region {
            settings.region = region.clone();
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        settings.llm = self.llm.clone();
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory (--data flag).
    pub data: Option<PathBuf>,
}

/// Non-empty value of an environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

/// Load settings with explicit options.
///
/// An explicit `--config` file that cannot be read or parsed is an error;
/// a discovered one is only warned about.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let mut settings = Settings::default();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base_dir = config.base_dir().unwrap_or(cwd);
    config.apply_to_settings(&mut settings, &base_dir);

    if let Some(dir) = env_var("LOCHGUIDE_DATA_DIR") {
        tracing::debug!("Using LOCHGUIDE_DATA_DIR from environment: {}", dir);
        settings.data_dir = absolute(Path::new(shellexpand::tilde(&dir).as_ref()));
    }
    if let Some(region) = env_var("LOCHGUIDE_REGION") {
        settings.region = region;
    }
    if let Some(bind) = env_var("LOCHGUIDE_BIND") {
        settings.bind = bind;
    }

    // --data takes precedence over everything
    if let Some(ref data) = options.data {
        settings.data_dir = absolute(data);
    }

    Ok((settings, config))
}
