//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `$XDG_CONFIG_HOME/archtree/archtree.toml`, or an explicit path
//! 3. Environment variables: `ARCHTREE_SEPARATOR`, `ARCHTREE_SHOW_IDS`,
//!    `ARCHTREE_DEFAULT_LISTING`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DEFAULT_SEPARATOR;

/// Unified configuration for archtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Segment separator of listing entries (default: `\`)
    pub separator: char,
    /// Show node ids when rendering trees
    pub show_ids: bool,
    /// Listing used when a command gets none
    pub default_listing: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            show_ids: false,
            default_listing: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub separator: Option<String>,
    pub show_ids: Option<bool>,
    pub default_listing: Option<PathBuf>,
}

/// Get the XDG config directory for archtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "archtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("archtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// A separator must be exactly one character.
fn parse_separator(value: &str) -> Result<char, ApplicationError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ApplicationError::Config {
            message: format!("separator must be a single character, got {:?}", value),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Result<Self, ApplicationError> {
        Ok(Self {
            separator: overlay
                .separator
                .as_deref()
                .map(parse_separator)
                .transpose()?
                .unwrap_or(self.separator),
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
            default_listing: overlay
                .default_listing
                .clone()
                .or_else(|| self.default_listing.clone()),
        })
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the default listing path.
    fn expand_paths(&mut self) -> Result<(), ApplicationError> {
        if let Some(listing) = self.default_listing.take() {
            let raw = listing.to_string_lossy().into_owned();
            let expanded = shellexpand::full(&raw)
                .map_err(|e| ApplicationError::Config {
                    message: format!("expand {}: {}", raw, e),
                })?
                .into_owned();
            self.default_listing = Some(PathBuf::from(expanded));
        }
        Ok(())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; replaces the global one. Must exist.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?)?;
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        debug!("loading global config {}", global_path.display());
                        current = current.merge_with(&load_raw_settings(&global_path)?)?;
                    }
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths()?;

        Ok(current)
    }

    /// Apply ARCHTREE_* environment variables as explicit overrides.
    ///
    /// The prefix is joined with a single `_`; `__` only separates nested keys.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ARCHTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("separator") {
            settings.separator = parse_separator(&val)?;
        }
        if let Ok(val) = config.get_bool("show_ids") {
            settings.show_ids = val;
        }
        if let Ok(val) = config.get_string("default_listing") {
            settings.default_listing = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Render as TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
