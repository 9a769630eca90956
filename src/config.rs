//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/domnav/domnav.toml`
//! 3. Local config: `./.domnav.toml`, or the file given with `--config`
//! 4. Environment variables: `DOMNAV_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// What to do with a case whose construction lines do not close at the root.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Stop the whole run
    #[default]
    Abort,
    /// Drop the case, log a warning and carry on with the next one
    Skip,
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchPolicy::Abort => f.write_str("abort"),
            MismatchPolicy::Skip => f.write_str("skip"),
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub pop_marker: Option<String>,
    pub case_header: Option<String>,
    pub on_mismatch: Option<MismatchPolicy>,
}

/// Unified configuration for domnav.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tree line that closes the current node
    pub pop_marker: String,
    /// Header written before each answered case; `{n}` is the case number
    pub case_header: String,
    /// Handling of structurally broken cases
    pub on_mismatch: MismatchPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pop_marker: "</n>".into(),
            case_header: "Case {n}:".into(),
            on_mismatch: MismatchPolicy::Abort,
        }
    }
}

/// Get the XDG config directory for domnav.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "domnav").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("domnav.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".domnav.toml")
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

/// Expand `~`, `$VAR` and `${VAR}` in a path given on the command line.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Case header for case number `n` (1-based).
    pub fn header_for(&self, n: usize) -> String {
        self.case_header.replace("{n}", &n.to_string())
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            pop_marker: overlay
                .pop_marker
                .clone()
                .unwrap_or_else(|| self.pop_marker.clone()),
            case_header: overlay
                .case_header
                .clone()
                .unwrap_or_else(|| self.case_header.clone()),
            on_mismatch: overlay.on_mismatch.unwrap_or(self.on_mismatch),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit local config file; must exist if given.
    ///   Without it `./.domnav.toml` is used when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        let local_path = match config_file {
            Some(path) => {
                let path = expand_path(path);
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                Some(path)
            }
            None => std::env::current_dir()
                .ok()
                .map(|dir| local_config_path(&dir))
                .filter(|path| path.exists()),
        };
        if let Some(path) = local_path {
            debug!("loading local config: {}", path.display());
            current = current.merge_with(&load_raw_settings(&path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Load settings from a single file on top of the defaults only.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply DOMNAV_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("DOMNAV").separator("__"))
            .build()
            .map_err(config_err)?;
        settings.apply_overrides(&config)
    }

    fn apply_overrides(mut self, config: &Config) -> Result<Self, ApplicationError> {
        if let Ok(val) = config.get_string("pop_marker") {
            self.pop_marker = val;
        }
        if let Ok(val) = config.get_string("case_header") {
            self.case_header = val;
        }
        match config.get::<MismatchPolicy>("on_mismatch") {
            Ok(val) => self.on_mismatch = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.pop_marker.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "pop_marker must not be empty".into(),
            });
        }
        if self.pop_marker.contains('\'') {
            return Err(ApplicationError::Config {
                message: "pop_marker must not contain the value delimiter '".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# domnav configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/domnav/domnav.toml
#   Local:  ./.domnav.toml (or --config FILE)
#   Env:    DOMNAV_* environment variables

# Tree line that closes the current node
# pop_marker = "</n>"

# Header written before each answered case, {n} is the case number
# case_header = "Case {n}:"

# Cases whose tree lines do not close at the root: "abort" or "skip"
# on_mismatch = "abort"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
