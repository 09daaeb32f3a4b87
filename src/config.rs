//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `ORGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::HIT_RADIUS;
use crate::util::path::expand_env_vars;

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub opener: Option<String>,
    pub hit_radius: Option<f64>,
    pub default_document: Option<PathBuf>,
}

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Command used to open attached files (default: platform opener)
    pub opener: String,
    /// Radius of a node's clickable region
    pub hit_radius: f64,
    /// Document used when no `--file` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_document: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opener: default_opener().to_string(),
            hit_radius: HIT_RADIUS,
            default_document: None,
        }
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
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

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(doc) = &self.default_document {
            self.default_document = Some(PathBuf::from(expand_env_vars(
                doc.to_string_lossy().as_ref(),
            )));
        }
        // Opener may be a path like ~/bin/open-any
        self.opener = expand_env_vars(&self.opener);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            opener: overlay
                .opener
                .clone()
                .unwrap_or_else(|| self.opener.clone()),
            hit_radius: overlay.hit_radius.unwrap_or(self.hit_radius),
            default_document: overlay
                .default_document
                .clone()
                .or_else(|| self.default_document.clone()),
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return Err(ApplicationError::Config {
                message: format!("hit_radius must be positive, got {}", self.hit_radius),
            });
        }
        if self.opener.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "opener must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `ORGTREE_*` prefix
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = present(config.get_string("opener"))? {
            settings.opener = val;
        }
        if let Some(val) = present(config.get_float("hit_radius"))? {
            settings.hit_radius = val;
        }
        if let Some(val) = present(config.get_string("default_document"))? {
            settings.default_document = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/orgtree/orgtree.toml
#   Explicit: orgtree --config <file>
#   Env:      ORGTREE_* environment variables (ORGTREE_OPENER, ORGTREE_HIT_RADIUS, ...)

# Command used to open files attached to nodes
# opener = "xdg-open"

# Radius of the clickable region around a node (used by `--at X,Y`)
# hit_radius = 20.0

# Document used when no --file is given
# default_document = "~/org/tree.json"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// An unset key is `None`; a value that does not convert is an error.
fn present<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}
