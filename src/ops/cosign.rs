//! The full signing update: open, locate, apply, save.

use std::path::PathBuf;

use crate::core::error::CosignError;
use crate::core::platform::{ensure_supported, Platform};
use crate::core::project::{Project, ProjectFormat};
use crate::core::signing::{FieldUpdate, SigningParams};
use crate::ops::apply::apply;
use crate::ops::locate::{locate, Located};

/// Options for [`cosign`].
#[derive(Debug, Clone)]
pub struct CosignOptions {
    /// `.xcodeproj` bundle or `project.pbxproj` document
    pub project_path: PathBuf,
    /// Target name
    pub scheme: String,
    /// Build configuration name
    pub build_configuration: String,
    pub params: SigningParams,
    /// Platform of the calling lane, if known
    pub platform: Option<String>,
    /// Apply in memory but do not save
    pub dry_run: bool,
}

/// What [`cosign`] did.
#[derive(Debug, Clone)]
pub struct CosignReport {
    /// The `project.pbxproj` document that was edited.
    pub document_path: PathBuf,
    pub format: ProjectFormat,
    pub platform: Option<Platform>,
    pub located: Located,
    pub updates: Vec<FieldUpdate>,
    /// False for dry runs.
    pub saved: bool,
}

impl CosignReport {
    /// Number of fields whose stored value changed.
    pub fn changed(&self) -> usize {
        self.updates.iter().filter(|u| u.is_change()).count()
    }
}

/// Apply signing settings to a project on disk.
///
/// An unsupported platform is rejected before the project is opened. Lookup
/// failures abort before the document is modified, and nothing is written in
/// that case. Otherwise the document is saved once, atomically, unless
/// `dry_run` is set.
pub fn cosign(opts: &CosignOptions) -> Result<CosignReport, CosignError> {
    let platform = opts
        .platform
        .as_deref()
        .map(ensure_supported)
        .transpose()?;

    let mut project = Project::open(&opts.project_path)?;
    tracing::info!(
        "Updating code signing settings of {} for {}/{}",
        project.path().display(),
        opts.scheme,
        opts.build_configuration
    );

    let located = locate(&mut project, &opts.scheme, &opts.build_configuration)?;
    let updates = apply(&mut project, &located, &opts.params)?;

    if opts.dry_run {
        tracing::debug!("Dry run; not saving {}", project.path().display());
    } else {
        project.save()?;
    }

    Ok(CosignReport {
        document_path: project.path().to_path_buf(),
        format: project.format(),
        platform,
        located,
        updates,
        saved: !opts.dry_run,
    })
}
