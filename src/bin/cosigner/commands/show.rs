//! `cosigner show` command

use anyhow::Result;

use crate::cli::ShowArgs;
use crate::commands::selection;
use crate::GlobalOptions;
use cosigner::core::build_settings::PROVISIONING_STYLE_ATTRIBUTE;
use cosigner::ops::signing_settings;
use cosigner::util::GlobalContext;
use cosigner::Project;

pub fn execute(args: ShowArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();
    let selection = selection(&ctx, &config, &args.selection)?;

    let project = Project::open(&selection.project_path)?;
    let snapshot = signing_settings(&project, &selection.scheme, &selection.build_configuration)?;

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "signing-settings",
            "target": snapshot.target,
            "configuration": snapshot.configuration,
            "provisioning_style": snapshot.provisioning_style,
            "settings": snapshot.settings,
        }));
        return Ok(());
    }

    shell.print(format!(
        "{} ({})",
        snapshot.target.name, snapshot.configuration.name
    ));

    let width = snapshot
        .settings
        .iter()
        .map(|s| s.key.len())
        .chain([PROVISIONING_STYLE_ATTRIBUTE.len()])
        .max()
        .unwrap_or_default();

    shell.print(format!(
        "  {:<width$}  {}",
        PROVISIONING_STYLE_ATTRIBUTE,
        snapshot.provisioning_style.as_deref().unwrap_or("(not set)"),
        width = width
    ));
    if snapshot.settings.is_empty() {
        shell.print("  (no signing build settings)");
    }
    for entry in &snapshot.settings {
        shell.print(format!("  {:<width$}  {}", entry.key, entry.value, width = width));
    }

    Ok(())
}
