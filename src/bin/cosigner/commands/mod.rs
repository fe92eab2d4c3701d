//! Command implementations

pub mod apply;
pub mod completions;
pub mod config;
pub mod show;
pub mod targets;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{ProjectArgs, SelectionArgs};
use cosigner::util::{Config, GlobalContext};
use cosigner::CosignError;

/// Pick the project: flag or env, then config, then the only bundle in cwd.
pub fn project_path(ctx: &GlobalContext, config: &Config, args: &ProjectArgs) -> Result<PathBuf> {
    if let Some(path) = args.xcodeproj_path.as_ref().or(config.project.path.as_ref()) {
        return Ok(ctx.resolve(path));
    }
    Ok(ctx.find_project()?)
}

/// A fully resolved target selection.
#[derive(Debug)]
pub struct Selection {
    pub project_path: PathBuf,
    pub scheme: String,
    pub build_configuration: String,
}

/// Resolve project, scheme, and configuration from flags and config.
pub fn selection(ctx: &GlobalContext, config: &Config, args: &SelectionArgs) -> Result<Selection> {
    let scheme = args
        .scheme
        .clone()
        .or_else(|| config.project.scheme.clone())
        .ok_or(CosignError::MissingParameter {
            name: "scheme",
            env: "SCHEME",
            config_key: "project.scheme",
        })?;
    let build_configuration = args
        .build_configuration
        .clone()
        .or_else(|| config.project.build_configuration.clone())
        .ok_or(CosignError::MissingParameter {
            name: "build_configuration",
            env: "BUILD_CONFIGURATION",
            config_key: "project.build_configuration",
        })?;

    Ok(Selection {
        project_path: project_path(ctx, config, &args.project)?,
        scheme,
        build_configuration,
    })
}
