//! Write signing parameters into a located build configuration.

use plist::{Dictionary, Value};

use crate::core::build_settings::{
    sdk_key, CODE_SIGN_IDENTITY, CODE_SIGN_STYLE, DEVELOPMENT_TEAM, IPHONEOS_SDK,
    PRODUCT_BUNDLE_IDENTIFIER, PROVISIONING_PROFILE, PROVISIONING_PROFILE_SPECIFIER,
    PROVISIONING_STYLE_ATTRIBUTE,
};
use crate::core::error::CosignError;
use crate::core::project::Project;
use crate::core::signing::{FieldUpdate, SettingScope, SettingWrite, SigningField, SigningParams};
use crate::ops::locate::Located;

/// Apply `params` to the configuration and target in `located`.
///
/// Writes happen in a fixed order:
///
/// | Parameter | Keys |
/// |---|---|
/// | style | `ProvisioningStyle` target attribute, `CODE_SIGN_STYLE` |
/// | identity | `CODE_SIGN_IDENTITY`, `CODE_SIGN_IDENTITY[sdk=iphoneos*]` |
/// | profile name | `PROVISIONING_PROFILE_SPECIFIER` |
/// | profile UUID | `PROVISIONING_PROFILE`, only when given |
/// | team | `DEVELOPMENT_TEAM`, only when given |
/// | bundle identifier | `PRODUCT_BUNDLE_IDENTIFIER`, only when given |
///
/// Absent optional parameters leave existing keys alone. Values are written
/// as given. The returned updates describe every write, in order.
pub fn apply(
    project: &mut Project,
    located: &Located,
    params: &SigningParams,
) -> Result<Vec<FieldUpdate>, CosignError> {
    if !params.has_known_style() {
        tracing::warn!(
            "code signing style `{}` is neither Manual nor Automatic; writing it anyway",
            params.code_sign_style
        );
    }

    let mut updates = Vec::with_capacity(6);

    let previous = set_string(
        project.target_attributes_mut(&located.target)?,
        PROVISIONING_STYLE_ATTRIBUTE,
        &params.code_sign_style,
    );
    let attribute_write = SettingWrite {
        scope: SettingScope::TargetAttribute,
        key: PROVISIONING_STYLE_ATTRIBUTE.to_string(),
        previous,
    };

    let settings = project.build_settings_mut(&located.configuration)?;

    let mut style = field(SigningField::CodeSignStyle, &params.code_sign_style);
    style.writes.push(attribute_write);
    write_setting(settings, &mut style, CODE_SIGN_STYLE);
    updates.push(style);

    let mut identity = field(SigningField::CodeSignIdentity, &params.code_sign_identity);
    write_setting(settings, &mut identity, CODE_SIGN_IDENTITY);
    write_setting(settings, &mut identity, &sdk_key(CODE_SIGN_IDENTITY, IPHONEOS_SDK));
    updates.push(identity);

    let mut profile = field(SigningField::ProfileName, &params.profile_name);
    write_setting(settings, &mut profile, PROVISIONING_PROFILE_SPECIFIER);
    updates.push(profile);

    let optional = [
        (SigningField::ProfileUuid, &params.profile_uuid, PROVISIONING_PROFILE),
        (SigningField::DevelopmentTeam, &params.development_team, DEVELOPMENT_TEAM),
        (
            SigningField::BundleIdentifier,
            &params.bundle_identifier,
            PRODUCT_BUNDLE_IDENTIFIER,
        ),
    ];
    for (kind, value, key) in optional {
        if let Some(value) = value {
            let mut update = field(kind, value);
            write_setting(settings, &mut update, key);
            updates.push(update);
        }
    }

    for update in &updates {
        tracing::debug!("{:?} = {:?}", update.field, update.value);
    }

    Ok(updates)
}

fn field(kind: SigningField, value: &str) -> FieldUpdate {
    FieldUpdate {
        field: kind,
        value: value.to_string(),
        writes: Vec::new(),
    }
}

fn write_setting(settings: &mut Dictionary, update: &mut FieldUpdate, key: &str) {
    let previous = set_string(settings, key, &update.value);
    update.writes.push(SettingWrite {
        scope: SettingScope::BuildSetting,
        key: key.to_string(),
        previous,
    });
}

/// Store a string, returning the previous value if it was a string.
fn set_string(dict: &mut Dictionary, key: &str, value: &str) -> Option<String> {
    dict.insert(key.to_string(), Value::String(value.to_string()))
        .and_then(|old| old.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::locate::locate;
    use crate::test_support::{ids, keys, project, projects, string_at};

    fn located(project: &mut Project, target: &str, configuration: &str) -> Located {
        locate(project, target, configuration).unwrap()
    }

    fn settings<'a>(project: &'a Project, located: &Located) -> &'a Dictionary {
        project.build_settings(&located.configuration).unwrap()
    }

    // =========================================================================
    // Field Writes
    // =========================================================================

    #[test]
    fn test_style_is_written_to_both_locations() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "AppTests", "Release");
        let params = SigningParams::new("Profile").with_code_sign_style("Automatic");

        apply(&mut project, &loc, &params).unwrap();

        assert_eq!(
            string_at(settings(&project, &loc), &[CODE_SIGN_STYLE]),
            Some("Automatic")
        );
        let attrs = project.target_attributes(&loc.target).unwrap();
        assert_eq!(
            string_at(attrs, &[PROVISIONING_STYLE_ATTRIBUTE]),
            Some("Automatic")
        );
    }

    #[test]
    fn test_identity_written_plain_and_for_iphoneos() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "App", "Debug");
        let params = SigningParams::new("Profile").with_code_sign_identity("Apple Distribution");

        apply(&mut project, &loc, &params).unwrap();

        let settings = settings(&project, &loc);
        assert_eq!(
            string_at(settings, &["CODE_SIGN_IDENTITY"]),
            Some("Apple Distribution")
        );
        assert_eq!(
            string_at(settings, &["CODE_SIGN_IDENTITY[sdk=iphoneos*]"]),
            Some("Apple Distribution")
        );
        // Other SDK qualifiers are not ours to touch.
        assert_eq!(string_at(settings, &["CODE_SIGN_IDENTITY[sdk=macosx*]"]), Some("-"));
    }

    #[test]
    fn test_omitted_profile_uuid_keeps_existing_value() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "App", "Debug");

        let updates = apply(&mut project, &loc, &SigningParams::new("Profile")).unwrap();

        assert_eq!(
            string_at(settings(&project, &loc), &[PROVISIONING_PROFILE]),
            Some("11111111-2222-3333-4444-555555555555")
        );
        assert!(updates.iter().all(|u| u.field != SigningField::ProfileUuid));
    }

    #[test]
    fn test_profile_uuid_overwrites_when_given() {
        let mut project = project(projects::LEGACY);
        let loc = located(&mut project, "Legacy", "Release");
        let params = SigningParams::new("Profile").with_profile_uuid("new-uuid");

        let updates = apply(&mut project, &loc, &params).unwrap();

        assert_eq!(
            string_at(settings(&project, &loc), &[PROVISIONING_PROFILE]),
            Some("new-uuid")
        );
        let uuid = updates
            .iter()
            .find(|u| u.field == SigningField::ProfileUuid)
            .unwrap();
        assert_eq!(uuid.writes[0].previous.as_deref(), Some("legacy-uuid"));
    }

    #[test]
    fn test_development_team_alters_only_its_key() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "App", "Debug");
        let params = SigningParams::new("Profile")
            .with_code_sign_style("Automatic")
            .with_code_sign_identity("-");

        // Bring every required key to a known state first.
        apply(&mut project, &loc, &params).unwrap();
        let before = settings(&project, &loc).clone();

        apply(
            &mut project,
            &loc,
            &params.clone().with_development_team("ABCDE12345"),
        )
        .unwrap();
        let after = settings(&project, &loc);

        assert_eq!(string_at(after, &[DEVELOPMENT_TEAM]), Some("ABCDE12345"));
        assert_eq!(keys(after), keys(&before));
        for key in keys(&before) {
            if key != DEVELOPMENT_TEAM {
                assert_eq!(after.get(key), before.get(key), "{key} changed");
            }
        }
    }

    #[test]
    fn test_bundle_identifier_written_when_given() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "AppTests", "Debug");
        let params = SigningParams::new("Profile").with_bundle_identifier("com.example.tests");

        apply(&mut project, &loc, &params).unwrap();

        assert_eq!(
            string_at(settings(&project, &loc), &[PRODUCT_BUNDLE_IDENTIFIER]),
            Some("com.example.tests")
        );
    }

    // =========================================================================
    // Whole-Configuration Scenarios
    // =========================================================================

    #[test]
    fn test_empty_release_configuration_gets_exactly_four_keys() {
        let source = projects::APP.replace("\t\t\t\t\t\tCreatedOnToolsVersion = 15.0;\n", "");
        let mut project = project(&source);
        let loc = located(&mut project, "App", "Release");
        assert!(settings(&project, &loc).is_empty());

        let params = SigningParams::new("AppStore Profile")
            .with_code_sign_style("Automatic")
            .with_code_sign_identity("iPhone Distribution");
        apply(&mut project, &loc, &params).unwrap();

        let settings = settings(&project, &loc);
        assert_eq!(
            keys(settings),
            vec![
                "CODE_SIGN_STYLE",
                "CODE_SIGN_IDENTITY",
                "CODE_SIGN_IDENTITY[sdk=iphoneos*]",
                "PROVISIONING_PROFILE_SPECIFIER",
            ]
        );
        assert_eq!(string_at(settings, &[CODE_SIGN_STYLE]), Some("Automatic"));
        assert_eq!(
            string_at(settings, &["CODE_SIGN_IDENTITY[sdk=iphoneos*]"]),
            Some("iPhone Distribution")
        );
        assert_eq!(
            string_at(settings, &[PROVISIONING_PROFILE_SPECIFIER]),
            Some("AppStore Profile")
        );

        let attrs = project.target_attributes(&loc.target).unwrap();
        assert_eq!(keys(attrs), vec![PROVISIONING_STYLE_ATTRIBUTE]);
        assert_eq!(
            string_at(attrs, &[PROVISIONING_STYLE_ATTRIBUTE]),
            Some("Automatic")
        );
    }

    #[test]
    fn test_other_configurations_are_untouched() {
        let mut project = project(projects::APP);
        let debug_before = project.object(ids::APP_DEBUG).unwrap().clone();

        let loc = located(&mut project, "App", "Release");
        apply(&mut project, &loc, &SigningParams::new("Profile")).unwrap();

        assert_eq!(project.object(ids::APP_DEBUG).unwrap(), &debug_before);
    }

    #[test]
    fn test_missing_build_settings_map_is_created() {
        let source = projects::LEGACY.replace(
            "\t\t\tbuildSettings = { PROVISIONING_PROFILE = \"legacy-uuid\"; };\n",
            "",
        );
        let mut project = project(&source);
        let loc = located(&mut project, "Legacy", "Release");
        assert!(project.build_settings(&loc.configuration).is_none());

        apply(&mut project, &loc, &SigningParams::new("Profile")).unwrap();

        assert_eq!(settings(&project, &loc).len(), 4);
    }

    #[test]
    fn test_unknown_style_is_written_verbatim() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "App", "Release");
        let params = SigningParams::new("Profile").with_code_sign_style("manual");

        apply(&mut project, &loc, &params).unwrap();

        assert_eq!(
            string_at(settings(&project, &loc), &[CODE_SIGN_STYLE]),
            Some("manual")
        );
    }

    // =========================================================================
    // Reported Updates
    // =========================================================================

    #[test]
    fn test_updates_follow_table_order_with_previous_values() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "App", "Debug");
        let params = SigningParams::new("Profile")
            .with_profile_uuid("uuid")
            .with_development_team("OLDTEAM123")
            .with_bundle_identifier("com.example.app");

        let updates = apply(&mut project, &loc, &params).unwrap();

        let fields: Vec<_> = updates.iter().map(|u| u.field).collect();
        assert_eq!(
            fields,
            vec![
                SigningField::CodeSignStyle,
                SigningField::CodeSignIdentity,
                SigningField::ProfileName,
                SigningField::ProfileUuid,
                SigningField::DevelopmentTeam,
                SigningField::BundleIdentifier,
            ]
        );

        let style = &updates[0];
        assert_eq!(style.writes.len(), 2);
        assert_eq!(style.writes[0].scope, SettingScope::TargetAttribute);
        assert_eq!(style.writes[0].previous, None);
        assert_eq!(style.writes[1].key, CODE_SIGN_STYLE);
        assert_eq!(style.writes[1].previous.as_deref(), Some("Automatic"));
        assert!(style.is_change());

        assert!(!updates[4].is_change());
        assert!(!updates[5].is_change());
    }

    #[test]
    fn test_apply_twice_reports_no_changes() {
        let mut project = project(projects::APP);
        let loc = located(&mut project, "AppTests", "Release");
        let params = SigningParams::new("Profile").with_development_team("ABCDE12345");

        apply(&mut project, &loc, &params).unwrap();
        let snapshot = project.document().clone();
        let updates = apply(&mut project, &loc, &params).unwrap();

        assert!(updates.iter().all(|u| !u.is_change()));
        assert_eq!(project.document(), &snapshot);
    }
}
