//! Configuration file support for cosigner.
//!
//! cosigner supports two configuration file locations:
//! - Global: `~/.cosigner/config.toml` - User-wide defaults
//! - Project: `.cosigner/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! and environment variables take precedence over both.
//!
//! ```toml
//! [project]
//! path = "App.xcodeproj"
//! scheme = "App"
//! build_configuration = "Release"
//!
//! [signing]
//! code_sign_style = "Manual"
//! profile_name = "App Store Profile"
//! development_team = "ABCDE12345"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the per-project and per-user configuration directory.
pub const CONFIG_DIR: &str = ".cosigner";

/// Name of the configuration file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Dotted keys accepted by `cosigner config set`.
pub const KNOWN_KEYS: &[&str] = &[
    "project.path",
    "project.scheme",
    "project.build_configuration",
    "signing.code_sign_style",
    "signing.code_sign_identity",
    "signing.profile_name",
    "signing.profile_uuid",
    "signing.development_team",
    "signing.bundle_identifier",
];

/// cosigner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which project, target, and configuration to edit
    pub project: ProjectConfig,

    /// Signing parameter defaults
    pub signing: SigningConfig,
}

/// Project selection defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Path to the `.xcodeproj` bundle, relative to the working directory
    pub path: Option<PathBuf>,

    /// Target name
    pub scheme: Option<String>,

    /// Build configuration name
    pub build_configuration: Option<String>,
}

/// Signing parameter defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub code_sign_style: Option<String>,
    pub code_sign_identity: Option<String>,
    pub profile_name: Option<String>,
    pub profile_uuid: Option<String>,
    pub development_team: Option<String>,
    pub bundle_identifier: Option<String>,
}

fn merge_option<T>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        merge_option(&mut self.project.path, other.project.path);
        merge_option(&mut self.project.scheme, other.project.scheme);
        merge_option(
            &mut self.project.build_configuration,
            other.project.build_configuration,
        );

        let signing = other.signing;
        merge_option(&mut self.signing.code_sign_style, signing.code_sign_style);
        merge_option(
            &mut self.signing.code_sign_identity,
            signing.code_sign_identity,
        );
        merge_option(&mut self.signing.profile_name, signing.profile_name);
        merge_option(&mut self.signing.profile_uuid, signing.profile_uuid);
        merge_option(
            &mut self.signing.development_team,
            signing.development_team,
        );
        merge_option(
            &mut self.signing.bundle_identifier,
            signing.bundle_identifier,
        );
    }

    /// Look up a value by dotted key, e.g. `signing.profile_name`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "project.path" => self.project.path.as_ref().map(|p| p.display().to_string()),
            "project.scheme" => self.project.scheme.clone(),
            "project.build_configuration" => self.project.build_configuration.clone(),
            "signing.code_sign_style" => self.signing.code_sign_style.clone(),
            "signing.code_sign_identity" => self.signing.code_sign_identity.clone(),
            "signing.profile_name" => self.signing.profile_name.clone(),
            "signing.profile_uuid" => self.signing.profile_uuid.clone(),
            "signing.development_team" => self.signing.development_team.clone(),
            "signing.bundle_identifier" => self.signing.bundle_identifier.clone(),
            _ => None,
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cosigner/config.toml)
/// 2. Global config (~/.cosigner/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global cosigner config directory (~/.cosigner).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.cosigner/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the project config path (.cosigner/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}
