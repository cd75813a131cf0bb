//! Application configuration management.
//!
//! Settings are merged with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. The platform config file (`config.toml` under the project config dir)
//! 3. An explicit `--config` file
//! 4. `DUPURGE_*` environment variables (`__` separates nested keys)
//! 5. Command-line flags ([`Config::apply_cli`])

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPURGE_";

/// Configuration and root validation errors.
///
/// All of these are fatal and are reported before any file is read.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The work root equals the golden root or lies inside it.
    #[error("work path is under golden: '{work}' is inside '{golden}'")]
    WorkInsideGolden {
        /// Normalized work root
        work: PathBuf,
        /// Normalized golden root
        golden: PathBuf,
    },

    /// The work root does not exist or is not a directory.
    #[error("work directory not found: {0}")]
    WorkNotFound(PathBuf),

    /// The golden root does not exist or is not a directory.
    #[error("golden directory not found: {0}")]
    GoldenNotFound(PathBuf),

    /// A root could not be made absolute.
    #[error("cannot resolve path {path}: {source}")]
    InvalidPath {
        /// The path as given
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    /// A config layer could not be parsed or merged.
    #[error("invalid configuration: {0}")]
    Load(Box<figment::Error>),

    /// The configuration could not be rendered as TOML.
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The configuration could not be written.
    #[error("cannot write config to {path}: {source}")]
    Save {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Include paths with a dot-prefixed component.
    pub include_hidden: bool,
    /// Include zero-length files.
    pub include_empty: bool,
    /// Carry-forward limit base; unset means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
    /// Remove directories left empty in the work tree after a purge.
    pub cleanup_empty_dirs: bool,
    /// File names that do not keep a directory alive during cleanup.
    pub marker_files: Vec<String>,
    /// Show progress bars.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_hidden: true,
            include_empty: true,
            top: None,
            cleanup_empty_dirs: true,
            marker_files: vec![".DS_Store".to_string()],
            progress: true,
        }
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// The platform config file is used only if it exists; an explicit file
    /// must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] for a missing explicit file and
    /// [`ConfigError::Load`] if any layer is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
            log::debug!("Loading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            log::debug!("Loading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Apply command-line flags on top of the loaded settings.
    ///
    /// Flags only ever narrow the defaults (skip hidden, skip empty, no
    /// cleanup), so an unset flag leaves the config value alone.
    #[must_use]
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if cli.skip_hidden {
            self.include_hidden = false;
        }
        if cli.skip_empty {
            self.include_empty = false;
        }
        if cli.top.is_some() {
            self.top = cli.top;
        }
        if cli.no_cleanup {
            self.cleanup_empty_dirs = false;
        }
        if cli.quiet {
            self.progress = false;
        }
        self
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if rendering fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Save`] on I/O failure.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(save_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(save_err)
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupurge").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
