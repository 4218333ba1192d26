//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/qtree/qtree.toml`
//! 3. Environment variables: `QTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DEFAULT_ANSWER;

/// Unified configuration for qtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tree file used when none is given on the command line
    pub tree_file: PathBuf,
    /// Answer a brand-new tree starts with
    pub default_answer: String,
    /// Write the tree back after a play session
    pub autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tree_file: default_tree_file(),
            default_answer: DEFAULT_ANSWER.to_string(),
            autosave: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tree_file: Option<PathBuf>,
    pub default_answer: Option<String>,
    pub autosave: Option<bool>,
}

/// Get the default tree file (`<data dir>/qtree/tree.txt`).
fn default_tree_file() -> PathBuf {
    ProjectDirs::from("", "", "qtree")
        .map(|dirs| dirs.data_dir().join("tree.txt"))
        .unwrap_or_else(|| PathBuf::from("tree.txt"))
}

/// Get the XDG config directory for qtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "qtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("qtree.toml"))
}

/// Expand shell variables and tilde (`~`, `$VAR`, `${VAR}`).
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence from the standard locations.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using `global` as the config file.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. `global` config file, if it exists (only specified fields override)
    /// 3. Environment variables: `QTREE_*` prefix
    pub fn load_from(global: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("loading config from {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            tree_file: overlay
                .tree_file
                .clone()
                .unwrap_or_else(|| self.tree_file.clone()),
            default_answer: overlay
                .default_answer
                .clone()
                .unwrap_or_else(|| self.default_answer.clone()),
            autosave: overlay.autosave.unwrap_or(self.autosave),
        }
    }

    /// Apply QTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("QTREE").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("tree_file") {
            settings.tree_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("default_answer") {
            settings.default_answer = val;
        }
        if let Ok(val) = config.get_bool("autosave") {
            settings.autosave = val;
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.tree_file.to_string_lossy().as_ref());
        self.tree_file = PathBuf::from(expanded);
    }

    /// Render as TOML, for `qtree config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

/// Commented template written by `qtree config init`.
pub fn config_template() -> String {
    let defaults = Settings::default();
    format!(
        r#"# qtree configuration

# Tree file used when none is given on the command line
# tree_file = "{}"

# Answer a brand-new tree starts with
# default_answer = "{}"

# Write the tree back after a play session
# autosave = {}
"#,
        defaults.tree_file.display(),
        defaults.default_answer,
        defaults.autosave
    )
}
