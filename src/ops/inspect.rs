//! Read-only views of a project's targets and signing settings.

use plist::Value;
use serde::Serialize;

use crate::core::build_settings::{SettingKey, PROVISIONING_STYLE_ATTRIBUTE, SIGNING_SETTINGS};
use crate::core::error::CosignError;
use crate::core::project::Project;
use crate::core::target::{ConfigurationRef, TargetRef};
use crate::ops::locate::resolve;

/// A target and the names of its build configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    #[serde(flatten)]
    pub target: TargetRef,
    pub configurations: Vec<String>,
}

/// List every target in document order.
pub fn list_targets(project: &Project) -> Result<Vec<TargetSummary>, CosignError> {
    project
        .targets()?
        .into_iter()
        .map(|target| {
            let configurations = project
                .configurations(&target)?
                .into_iter()
                .map(|c| c.name)
                .collect();
            Ok(TargetSummary {
                target,
                configurations,
            })
        })
        .collect()
}

/// One signing-related build setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
    /// Key as stored, including any qualifiers.
    pub key: String,
    pub value: String,
    pub conditional: bool,
}

/// The signing state of one target/configuration pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningSnapshot {
    pub target: TargetRef,
    pub configuration: ConfigurationRef,
    /// `ProvisioningStyle` from `TargetAttributes`.
    pub provisioning_style: Option<String>,
    /// Signing settings in display order; qualified variants follow their
    /// base key.
    pub settings: Vec<SettingEntry>,
}

/// Read the signing settings of `target_name`/`configuration_name`.
///
/// Never creates attribute entries or build settings maps.
pub fn signing_settings(
    project: &Project,
    target_name: &str,
    configuration_name: &str,
) -> Result<SigningSnapshot, CosignError> {
    let (target, configuration) = resolve(project, target_name, configuration_name)?;

    let provisioning_style = project
        .target_attributes(&target)
        .and_then(|attrs| attrs.get(PROVISIONING_STYLE_ATTRIBUTE))
        .map(display_value);

    let mut settings = Vec::new();
    if let Some(build_settings) = project.build_settings(&configuration) {
        let mut found: Vec<(usize, SettingKey, &str, &Value)> = build_settings
            .iter()
            .filter_map(|(key, value)| {
                let parsed = SettingKey::parse(key)?;
                let rank = SIGNING_SETTINGS.iter().position(|s| *s == parsed.base)?;
                Some((rank, parsed, key.as_str(), value))
            })
            .collect();
        found.sort_by(|a, b| {
            (a.0, a.1.is_conditional(), a.2).cmp(&(b.0, b.1.is_conditional(), b.2))
        });

        settings = found
            .into_iter()
            .map(|(_, parsed, key, value)| SettingEntry {
                key: key.to_string(),
                value: display_value(value),
                conditional: parsed.is_conditional(),
            })
            .collect();
    }

    Ok(SigningSnapshot {
        target,
        configuration,
        provisioning_style,
        settings,
    })
}

/// Render a setting value on one line.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Boolean(true) => "YES".to_string(),
        Value::Boolean(false) => "NO".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        other => format!("{:?}", other),
    }
}
