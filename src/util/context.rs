//! Global context for cosigner operations.
//!
//! Provides centralized access to the working directory, configuration
//! locations, and project discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::error::CosignError;
use crate::core::project::BUNDLE_EXTENSION;
use crate::util::config::{self, Config, CONFIG_DIR, CONFIG_FILE};
use crate::util::fs::glob_dirs;

/// Global context containing configuration paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global cosigner data (~/.cosigner/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = config::global_config_dir().unwrap_or_else(|| PathBuf::from(CONFIG_DIR));

        Ok(GlobalContext { cwd, home })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different global home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the cosigner home directory (~/.cosigner/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }

    /// Get the project-local configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        config::project_config_path(&self.cwd)
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self) -> Config {
        config::load_config(&self.config_path(), &self.project_config_path())
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Find the single `.xcodeproj` bundle in the working directory.
    pub fn find_project(&self) -> Result<PathBuf, CosignError> {
        let pattern = format!("*.{}", BUNDLE_EXTENSION);
        let mut candidates = glob_dirs(&self.cwd, &pattern).map_err(|e| {
            CosignError::Read {
                path: self.cwd.clone(),
                source: std::io::Error::other(format!("{:#}", e)),
            }
        })?;

        match candidates.len() {
            0 => Err(CosignError::NoProjectInDirectory {
                dir: self.cwd.clone(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(CosignError::AmbiguousProject {
                dir: self.cwd.clone(),
                candidates,
            }),
        }
    }
}
