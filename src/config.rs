//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bolsig2ctml/bolsig2ctml.toml`
//! 3. Local config: `<dir>/.bolsig2ctml.toml` (usually the working directory)
//! 4. Environment variables: `BOLSIG2CTML_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for bolsig2ctml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Document root tag (default: ctml)
    pub root_tag: String,
    /// Tag of each process element (default: process)
    pub process_tag: String,
    /// Input file when none is given on the command line
    pub input: PathBuf,
    /// Output file when none is given on the command line
    pub output: PathBuf,
    /// Emit comment blocks as XML comments
    pub include_comments: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_tag: "ctml".into(),
            process_tag: "process".into(),
            input: PathBuf::from("Cross section.txt"),
            output: PathBuf::from("lxcat.xml"),
            include_comments: false,
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// `None` means "not specified, inherit from the layer below".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_tag: Option<String>,
    pub process_tag: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub include_comments: Option<bool>,
}

/// Get the XDG config directory for bolsig2ctml.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bolsig2ctml").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bolsig2ctml.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".bolsig2ctml.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the path unchanged.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_tag: overlay
                .root_tag
                .clone()
                .unwrap_or_else(|| self.root_tag.clone()),
            process_tag: overlay
                .process_tag
                .clone()
                .unwrap_or_else(|| self.process_tag.clone()),
            input: overlay.input.clone().unwrap_or_else(|| self.input.clone()),
            output: overlay.output.clone().unwrap_or_else(|| self.output.clone()),
            include_comments: overlay.include_comments.unwrap_or(self.include_comments),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.input = expand_path(&self.input);
        self.output = expand_path(&self.output);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.bolsig2ctml.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply BOLSIG2CTML_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("BOLSIG2CTML")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("root_tag") {
            settings.root_tag = val;
        }
        if let Ok(val) = config.get_string("process_tag") {
            settings.process_tag = val;
        }
        if let Ok(val) = config.get_string("input") {
            settings.input = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("output") {
            settings.output = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("include_comments") {
            settings.include_comments = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
