//! Resolve a target and one of its build configurations by name.

use crate::core::error::CosignError;
use crate::core::project::Project;
use crate::core::target::{ConfigurationRef, TargetRef};

/// Handles to the objects a signing update touches.
///
/// The handles are object identifiers, so every later access through
/// [`Project`] reaches the same objects inside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub target: TargetRef,
    pub configuration: ConfigurationRef,
    /// Root object holding the `TargetAttributes` map.
    pub root_object_id: String,
}

/// Find `target_name` and its `configuration_name` configuration.
///
/// Both lookups are exact and case-sensitive. When several targets share the
/// name, the first one in the root object's `targets` array is used.
///
/// Once both lookups succeed, the `TargetAttributes` entry for the target is
/// created if it is missing (along with `attributes` and `TargetAttributes`
/// themselves). A failed lookup leaves the document untouched.
pub fn locate(
    project: &mut Project,
    target_name: &str,
    configuration_name: &str,
) -> Result<Located, CosignError> {
    let (target, configuration) = resolve(project, target_name, configuration_name)?;

    tracing::debug!("Located target {} with configuration {}", target, configuration);

    let root_object_id = project.root_object_id()?.to_string();
    if project.target_attributes(&target).is_none() {
        tracing::debug!("Creating TargetAttributes entry for {}", target.id);
    }
    project.target_attributes_mut(&target)?;

    Ok(Located {
        target,
        configuration,
        root_object_id,
    })
}

/// Look up a target and configuration by name without touching the document.
///
/// Uses the same matching rules as [`locate`].
pub fn resolve(
    project: &Project,
    target_name: &str,
    configuration_name: &str,
) -> Result<(TargetRef, ConfigurationRef), CosignError> {
    let targets = project.targets()?;
    let mut matches = targets.iter().filter(|t| t.name == target_name);

    let target = match matches.next() {
        Some(target) => target.clone(),
        None => {
            return Err(CosignError::TargetNotFound {
                name: target_name.to_string(),
                available: targets.iter().map(|t| t.name.clone()).collect(),
            })
        }
    };

    let duplicates: Vec<&str> = matches.map(|t| t.id.as_str()).collect();
    if !duplicates.is_empty() {
        tracing::warn!(
            "{} targets are named `{}`; using {} and ignoring {}",
            duplicates.len() + 1,
            target_name,
            target.id,
            duplicates.join(", ")
        );
    }

    let configurations = project.configurations(&target)?;
    let configuration = configurations
        .iter()
        .find(|c| c.name == configuration_name)
        .cloned()
        .ok_or_else(|| CosignError::ConfigurationNotFound {
            target: target.name.clone(),
            name: configuration_name.to_string(),
            available: configurations.iter().map(|c| c.name.clone()).collect(),
        })?;

    Ok((target, configuration))
}
