//! `cosigner apply` command

use anyhow::Result;

use crate::cli::ApplyArgs;
use crate::commands::selection;
use crate::GlobalOptions;
use cosigner::core::signing::{DEFAULT_CODE_SIGN_IDENTITY, DEFAULT_CODE_SIGN_STYLE};
use cosigner::core::{FieldUpdate, SettingScope, SigningParams};
use cosigner::ops::{cosign, CosignOptions, CosignReport};
use cosigner::util::{Config, GlobalContext, Shell, Status};
use cosigner::CosignError;

pub fn execute(args: ApplyArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    let selection = selection(&ctx, &config, &args.selection)?;
    let params = signing_params(&args, &config)?;

    let opts = CosignOptions {
        project_path: selection.project_path,
        scheme: selection.scheme,
        build_configuration: selection.build_configuration,
        params,
        platform: args.platform,
        dry_run: args.dry_run,
    };

    let span = shell.span(
        Status::Signing,
        format!("{} ({})", opts.scheme, opts.build_configuration),
    );
    let report = cosign(&opts)?;

    for update in &report.updates {
        report_update(shell, update, opts.dry_run);
    }

    shell.json_event(&serde_json::json!({
        "reason": "signing-applied",
        "project": report.document_path.display().to_string(),
        "target": report.located.target,
        "configuration": report.located.configuration,
        "changed": report.changed(),
        "saved": report.saved,
    }));

    finish(shell, span, &report);
    Ok(())
}

/// Merge flags (and their env fallbacks) over config, then built-in defaults.
fn signing_params(args: &ApplyArgs, config: &Config) -> Result<SigningParams> {
    let signing = &config.signing;
    let pick = |flag: &Option<String>, configured: &Option<String>| {
        flag.clone().or_else(|| configured.clone())
    };

    let profile_name = pick(&args.profile_name, &signing.profile_name).ok_or(
        CosignError::MissingParameter {
            name: "profile_name",
            env: "PROVISIONING_PROFILE_SPECIFIER",
            config_key: "signing.profile_name",
        },
    )?;

    Ok(SigningParams {
        code_sign_style: pick(&args.code_sign_style, &signing.code_sign_style)
            .unwrap_or_else(|| DEFAULT_CODE_SIGN_STYLE.to_string()),
        code_sign_identity: pick(&args.code_sign_identity, &signing.code_sign_identity)
            .unwrap_or_else(|| DEFAULT_CODE_SIGN_IDENTITY.to_string()),
        profile_name,
        profile_uuid: pick(&args.profile_uuid, &signing.profile_uuid),
        development_team: pick(&args.development_team, &signing.development_team),
        bundle_identifier: pick(&args.bundle_identifier, &signing.bundle_identifier),
    })
}

fn report_update(shell: &Shell, update: &FieldUpdate, dry_run: bool) {
    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "signing-field",
            "field": update.field,
            "value": update.value,
            "changed": update.is_change(),
            "writes": update.writes,
        }));
        return;
    }

    let message = format!("{} to `{}`", update.field.describe(), update.value);
    if dry_run {
        shell.status(Status::Info, format!("Would set {}", message));
    } else if update.is_change() {
        shell.status(Status::Updated, message);
    } else {
        shell.status(Status::Unchanged, message);
    }

    for write in &update.writes {
        let location = match write.scope {
            SettingScope::BuildSetting => "buildSettings",
            SettingScope::TargetAttribute => "TargetAttributes",
        };
        shell.detail(format!(
            "{}[{}]: {} -> {}",
            location,
            write.key,
            write.previous.as_deref().unwrap_or("<unset>"),
            update.value
        ));
    }
}

fn finish(shell: &Shell, span: cosigner::util::shell::Span, report: &CosignReport) {
    let summary = format!(
        "{} of {} settings changed in {}",
        report.changed(),
        report.updates.len(),
        report.document_path.display()
    );
    if report.saved {
        shell.status(
            Status::Saved,
            format!("{} ({})", report.document_path.display(), report.format),
        );
        span.finish_with_message(summary);
    } else {
        shell.status(Status::Skipped, format!("dry run, not saved ({})", summary));
    }
}
