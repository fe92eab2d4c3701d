//! Error type for project and signing operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::pbxproj::ParseError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Errors produced while opening, locating, mutating, or saving a project.
#[derive(Debug, Error)]
pub enum CosignError {
    #[error("project not found: {}", path.display())]
    ProjectNotFound { path: PathBuf },

    #[error("no .xcodeproj found in {}", dir.display())]
    NoProjectInDirectory { dir: PathBuf },

    #[error("multiple .xcodeproj bundles found in {}", dir.display())]
    AmbiguousProject {
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<ParseError>,
    },

    #[error("invalid property list in {}", path.display())]
    Plist {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    #[error("malformed project: {message}")]
    MalformedProject { message: String },

    #[error("no target named `{name}`")]
    TargetNotFound { name: String, available: Vec<String> },

    #[error("target `{target}` has no build configuration named `{name}`")]
    ConfigurationNotFound {
        target: String,
        name: String,
        available: Vec<String>,
    },

    #[error("failed to save {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("platform `{platform}` is not supported")]
    UnsupportedPlatform { platform: String },

    #[error("missing required parameter `{name}`")]
    MissingParameter {
        name: &'static str,
        env: &'static str,
        /// Dotted config key, e.g. `signing.profile_name`.
        config_key: &'static str,
    },
}

impl CosignError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CosignError::MalformedProject {
            message: message.into(),
        }
    }

    /// Whether the error happened before the document was touched.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            CosignError::TargetNotFound { .. } | CosignError::ConfigurationNotFound { .. }
        )
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            CosignError::ProjectNotFound { path } => diag
                .with_location(path)
                .with_suggestion(suggestions::NO_PROJECT),

            CosignError::NoProjectInDirectory { .. } => {
                diag.with_suggestion(suggestions::NO_PROJECT)
            }

            CosignError::AmbiguousProject { candidates, .. } => {
                let mut diag = diag;
                for candidate in candidates {
                    diag = diag.with_context(format!("found {}", candidate.display()));
                }
                diag.with_suggestion(suggestions::AMBIGUOUS_PROJECT)
            }

            CosignError::Read { path, source } | CosignError::Persist { path, source } => {
                diag.with_location(path).with_context(source.to_string())
            }

            CosignError::Parse { path, source } => diag
                .with_location(path)
                .with_context(format!(
                    "line {}, column {}: {}",
                    source.line(),
                    source.column(),
                    source.message()
                ))
                .with_suggestion(suggestions::MALFORMED_PROJECT),

            CosignError::Plist { path, source } => diag
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(suggestions::MALFORMED_PROJECT),

            CosignError::MalformedProject { .. } => {
                diag.with_suggestion(suggestions::MALFORMED_PROJECT)
            }

            CosignError::TargetNotFound { available, .. } => {
                let diag = if available.is_empty() {
                    diag.with_context("the project has no targets")
                } else {
                    diag.with_context(format!("available targets: {}", available.join(", ")))
                };
                diag.with_suggestion("Check the spelling of --scheme (names are case-sensitive)")
                    .with_suggestion(suggestions::TARGET_NOT_FOUND)
            }

            CosignError::ConfigurationNotFound { available, .. } => diag
                .with_context(format!(
                    "available configurations: {}",
                    available.join(", ")
                ))
                .with_suggestion(suggestions::CONFIGURATION_NOT_FOUND),

            CosignError::UnsupportedPlatform { .. } => diag
                .with_context("supported platforms: ios, mac")
                .with_suggestion(suggestions::UNSUPPORTED_PLATFORM),

            CosignError::MissingParameter {
                name,
                env,
                config_key,
            } => {
                let flag = name.replace('_', "-");
                diag.with_suggestion(format!(
                    "Pass `--{}`, set {}, or run `cosigner config set {} <value>`",
                    flag, env, config_key
                ))
            }
        }
    }
}
