//! Application configuration management.
//!
//! Settings are merged with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory
//! 3. The bare `DEFAULT_TARGET_PATH` variable (usually from `.env`)
//! 4. `PAF_*` environment variables
//!
//! CLI flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::DEFAULT_BUFFER_SIZE;

/// Default name of the duplicate report.
pub const DEFAULT_REPORT_FILE: &str = "duplicate_files.txt";

/// Prefix for environment overrides (`PAF_REPORT_FILE`, ...).
pub const ENV_PREFIX: &str = "PAF_";

/// Unprefixed variable naming the base destination for `mv`.
pub const TARGET_PATH_VAR: &str = "DEFAULT_TARGET_PATH";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory folders are moved under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target_path: Option<PathBuf>,
    /// Where `find-dup` writes its report.
    pub report_file: PathBuf,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Read/copy buffer size in bytes.
    pub buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_target_path: None,
            report_file: PathBuf::from(DEFAULT_REPORT_FILE),
            follow_symlinks: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Falls back to defaults (plus environment) if the file is unreadable.
    pub fn load() -> Self {
        let path = Self::config_path().ok();
        match Self::load_from(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {:#}", e);
                Self::figment(None).extract().unwrap_or_default()
            }
        }
    }

    /// Load the configuration, reading `path` as the TOML layer if given.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer holds a value of the wrong type.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(path)
            .extract()
            .context("Invalid configuration")?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Build the layered figment without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::raw().only(&[TARGET_PATH_VAR]))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Save the configuration to the default platform-specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save the configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "paf", "paf")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
