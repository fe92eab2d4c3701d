//! Build setting keys, including conditional variants.
//!
//! A build setting key may carry one or more qualifiers that restrict where
//! it applies, e.g. `CODE_SIGN_IDENTITY[sdk=iphoneos*]` or
//! `OTHER_LDFLAGS[sdk=macosx*][arch=arm64]`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const CODE_SIGN_STYLE: &str = "CODE_SIGN_STYLE";
pub const CODE_SIGN_IDENTITY: &str = "CODE_SIGN_IDENTITY";
pub const PROVISIONING_PROFILE_SPECIFIER: &str = "PROVISIONING_PROFILE_SPECIFIER";
pub const PROVISIONING_PROFILE: &str = "PROVISIONING_PROFILE";
pub const DEVELOPMENT_TEAM: &str = "DEVELOPMENT_TEAM";
pub const PRODUCT_BUNDLE_IDENTIFIER: &str = "PRODUCT_BUNDLE_IDENTIFIER";

/// Target attribute holding the signing style on Xcode 8.
pub const PROVISIONING_STYLE_ATTRIBUTE: &str = "ProvisioningStyle";

/// SDK pattern for iOS device builds.
pub const IPHONEOS_SDK: &str = "iphoneos*";

/// Settings that `show` reports, in display order.
pub const SIGNING_SETTINGS: &[&str] = &[
    CODE_SIGN_STYLE,
    CODE_SIGN_IDENTITY,
    PROVISIONING_PROFILE_SPECIFIER,
    PROVISIONING_PROFILE,
    DEVELOPMENT_TEAM,
    PRODUCT_BUNDLE_IDENTIFIER,
];

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)((?:\[[^\[\]=]+=[^\[\]]*\])*)$").unwrap()
});

static CONDITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]=]+)=([^\[\]]*)\]").unwrap());

/// A parsed build setting key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingKey {
    /// Setting name without qualifiers.
    pub base: String,
    /// `(condition, pattern)` pairs in source order, e.g. `("sdk", "iphoneos*")`.
    pub conditions: Vec<(String, String)>,
}

impl SettingKey {
    /// An unconditional key.
    pub fn new(base: impl Into<String>) -> Self {
        SettingKey {
            base: base.into(),
            conditions: Vec::new(),
        }
    }

    /// Add a condition qualifier.
    pub fn with_condition(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.conditions.push((name.into(), pattern.into()));
        self
    }

    /// Parse a key as it appears in `buildSettings`.
    ///
    /// Returns `None` for strings that are not well-formed setting keys.
    pub fn parse(key: &str) -> Option<Self> {
        let caps = KEY_RE.captures(key)?;
        let base = caps.get(1)?.as_str().to_string();
        let conditions = caps
            .get(2)
            .map(|m| {
                CONDITION_RE
                    .captures_iter(m.as_str())
                    .map(|c| (c[1].to_string(), c[2].to_string()))
                    .collect()
            })
            .unwrap_or_default();
        Some(SettingKey { base, conditions })
    }

    /// Whether this key has any qualifier.
    pub fn is_conditional(&self) -> bool {
        !self.conditions.is_empty()
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        for (name, pattern) in &self.conditions {
            write!(f, "[{}={}]", name, pattern)?;
        }
        Ok(())
    }
}

/// `base[sdk=pattern]`.
pub fn sdk_key(base: &str, sdk: &str) -> String {
    SettingKey::new(base).with_condition("sdk", sdk).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_key() {
        assert_eq!(
            sdk_key(CODE_SIGN_IDENTITY, IPHONEOS_SDK),
            "CODE_SIGN_IDENTITY[sdk=iphoneos*]"
        );
    }

    #[test]
    fn test_parse_plain_key() {
        let key = SettingKey::parse("DEVELOPMENT_TEAM").unwrap();
        assert_eq!(key.base, "DEVELOPMENT_TEAM");
        assert!(!key.is_conditional());
    }

    #[test]
    fn test_parse_conditional_key() {
        let key = SettingKey::parse("OTHER_LDFLAGS[sdk=macosx*][arch=arm64]").unwrap();
        assert_eq!(key.base, "OTHER_LDFLAGS");
        assert_eq!(
            key.conditions,
            vec![
                ("sdk".to_string(), "macosx*".to_string()),
                ("arch".to_string(), "arm64".to_string()),
            ]
        );
        assert_eq!(key.to_string(), "OTHER_LDFLAGS[sdk=macosx*][arch=arm64]");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SettingKey::parse("").is_none());
        assert!(SettingKey::parse("CODE SIGN").is_none());
        assert!(SettingKey::parse("KEY[sdk]").is_none());
        assert!(SettingKey::parse("KEY[sdk=ios").is_none());
    }
}
