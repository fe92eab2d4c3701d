//! Signing parameters and the record of what applying them changed.

use serde::Serialize;

/// Default code signing style.
pub const DEFAULT_CODE_SIGN_STYLE: &str = "Manual";

/// Default code signing identity.
pub const DEFAULT_CODE_SIGN_IDENTITY: &str = "iPhone Distribution";

/// Signing styles Xcode understands. Other values are written anyway.
pub const KNOWN_CODE_SIGN_STYLES: &[&str] = &["Manual", "Automatic"];

/// The signing parameters to inject into a build configuration.
///
/// Optional parameters only ever add or overwrite; `None` leaves whatever the
/// project already has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningParams {
    pub code_sign_style: String,
    pub code_sign_identity: String,
    pub profile_name: String,
    pub profile_uuid: Option<String>,
    pub development_team: Option<String>,
    pub bundle_identifier: Option<String>,
}

impl SigningParams {
    /// Parameters with the default style and identity.
    pub fn new(profile_name: impl Into<String>) -> Self {
        SigningParams {
            code_sign_style: DEFAULT_CODE_SIGN_STYLE.to_string(),
            code_sign_identity: DEFAULT_CODE_SIGN_IDENTITY.to_string(),
            profile_name: profile_name.into(),
            profile_uuid: None,
            development_team: None,
            bundle_identifier: None,
        }
    }

    pub fn with_code_sign_style(mut self, style: impl Into<String>) -> Self {
        self.code_sign_style = style.into();
        self
    }

    pub fn with_code_sign_identity(mut self, identity: impl Into<String>) -> Self {
        self.code_sign_identity = identity.into();
        self
    }

    pub fn with_profile_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.profile_uuid = Some(uuid.into());
        self
    }

    pub fn with_development_team(mut self, team: impl Into<String>) -> Self {
        self.development_team = Some(team.into());
        self
    }

    pub fn with_bundle_identifier(mut self, bundle_id: impl Into<String>) -> Self {
        self.bundle_identifier = Some(bundle_id.into());
        self
    }

    /// Whether the style is one Xcode recognizes.
    pub fn has_known_style(&self) -> bool {
        KNOWN_CODE_SIGN_STYLES.contains(&self.code_sign_style.as_str())
    }
}

/// One signing parameter, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningField {
    CodeSignStyle,
    CodeSignIdentity,
    ProfileName,
    ProfileUuid,
    DevelopmentTeam,
    BundleIdentifier,
}

impl SigningField {
    /// Short description of the keys the field is written to.
    pub fn describe(self) -> &'static str {
        match self {
            SigningField::CodeSignStyle => {
                "`ProvisioningStyle` (Xcode 8) and `CODE_SIGN_STYLE` (Xcode 9+)"
            }
            SigningField::CodeSignIdentity => "`CODE_SIGN_IDENTITY`",
            SigningField::ProfileName => "`PROVISIONING_PROFILE_SPECIFIER`",
            SigningField::ProfileUuid => "`PROVISIONING_PROFILE`",
            SigningField::DevelopmentTeam => "`DEVELOPMENT_TEAM`",
            SigningField::BundleIdentifier => "`PRODUCT_BUNDLE_IDENTIFIER`",
        }
    }
}

/// Which map a write went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingScope {
    /// The configuration's `buildSettings`.
    BuildSetting,
    /// The project's `TargetAttributes` entry for the target.
    TargetAttribute,
}

/// A single key write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingWrite {
    pub scope: SettingScope,
    pub key: String,
    /// The previous value, when it was a string.
    pub previous: Option<String>,
}

/// All writes made for one signing parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUpdate {
    pub field: SigningField,
    pub value: String,
    pub writes: Vec<SettingWrite>,
}

impl FieldUpdate {
    /// Whether any write replaced a different value or added a new key.
    pub fn is_change(&self) -> bool {
        self.writes
            .iter()
            .any(|w| w.previous.as_deref() != Some(self.value.as_str()))
    }
}
