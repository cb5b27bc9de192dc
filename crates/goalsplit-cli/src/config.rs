//! Configuration file management for goalsplit.
//!
//! Provides a TOML-based config file at `~/.config/goalsplit/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use goalsplit_core::decompose::GeminiConfig;
use goalsplit_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

/// Remote generation settings. Every field is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl GenerationSection {
    /// Overlay the file's settings on the built-in defaults.
    pub fn to_gemini_config(&self) -> GeminiConfig {
        let defaults = GeminiConfig::default();
        GeminiConfig {
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: self.model.clone().unwrap_or(defaults.model),
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the goalsplit config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/goalsplit` or
/// `~/.config/goalsplit`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("goalsplit");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("goalsplit")
}

/// Return the path to the goalsplit config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file. Returns `Ok(None)` if it does not exist.
pub fn load_config_from(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write a config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it may hold an API key.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct GoalsplitConfig {
    pub db_config: DbConfig,
    /// File-level generation settings. The environment is layered on top per
    /// request (see `DecomposerSource`).
    pub generation: GeminiConfig,
}

impl GoalsplitConfig {
    /// Resolve configuration from the default config file location.
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = load_config_from(&config_path())?;
        Ok(Self::resolve_with(cli_db_url, file_config.as_ref()))
    }

    /// Resolve using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `GOALSPLIT_DATABASE_URL` > `DATABASE_URL` >
    ///   `database.url` > `DbConfig::DEFAULT_URL`
    /// - Generation: `[generation]` section over built-in defaults
    pub fn resolve_with(cli_db_url: Option<&str>, file_config: Option<&ConfigFile>) -> Self {
        let db_url = cli_db_url
            .map(str::to_string)
            .or_else(DbConfig::url_from_env)
            .or_else(|| file_config.map(|cfg| cfg.database.url.clone()))
            .unwrap_or_else(|| DbConfig::DEFAULT_URL.to_string());

        let generation = file_config
            .map(|cfg| cfg.generation.to_gemini_config())
            .unwrap_or_default();

        Self {
            db_config: DbConfig::new(db_url),
            generation,
        }
    }
}

/// Mask a secret for display, keeping only its ends.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
