//! Site configuration management for `ctfc.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                         |
//! |------------|-------------------------------------------------|
//! | `[build]`  | Output root for compiled challenges             |
//! | `[serve]`  | Development server (interface, port)            |
//! | `[assets]` | Overrides for the shared CSS/JS inlined assets  |
//!
//! The config file is optional: every field has a default, and CLI
//! arguments override file values.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "dist"
//!
//! [serve]
//! interface = "0.0.0.0"
//! port = 8000
//!
//! [assets]
//! css = "branding/shared.css"
//! ```

mod assets;
mod build;
pub mod defaults;
mod error;
mod serve;

use assets::AssetsConfig;
use build::BuildConfig;
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing ctfc.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (set from CLI after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Shared asset overrides
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = Self::normalize_path(&cli.root);
        self.config_path = root.join(&cli.config);

        Self::update_option(&mut self.build.output, cli.output.as_ref());

        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }

        // Anchor relative paths at the project root
        self.build.output = Self::rebase(&root, &self.build.output);
        self.assets.css = self.assets.css.as_ref().map(|p| Self::rebase(&root, p));
        self.assets.js = self.assets.js.as_ref().map(|p| Self::rebase(&root, p));
        self.root = root;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Join a relative path onto `root`; absolute paths pass through
    fn rebase(root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        for (field, path) in [("[assets.css]", &self.assets.css), ("[assets.js]", &self.assets.js)]
        {
            if let Some(path) = path {
                if !path.exists() {
                    bail!(ConfigError::Validation(format!("{field} not found")));
                }
                if !path.is_file() {
                    bail!(ConfigError::Validation(format!("{field} is not a file")));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
