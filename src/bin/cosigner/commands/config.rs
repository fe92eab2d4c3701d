//! `cosigner config` command

use anyhow::{Context, Result};

use crate::cli::{ConfigArgs, ConfigCommand, ConfigSetArgs};
use crate::GlobalOptions;
use cosigner::ops::{set_config_value, SetResult};
use cosigner::util::config::KNOWN_KEYS;
use cosigner::util::{GlobalContext, Shell, Status};

pub fn execute(args: ConfigArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;

    match args.command {
        ConfigCommand::Show => show(shell, &ctx),
        ConfigCommand::Set(set) => set_value(shell, &ctx, set),
    }
}

fn show(shell: &Shell, ctx: &GlobalContext) -> Result<()> {
    let config = ctx.load_config();

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "config",
            "global": ctx.config_path().display().to_string(),
            "project": ctx.project_config_path().display().to_string(),
            "config": config,
        }));
        return Ok(());
    }

    for key in KNOWN_KEYS {
        if let Some(value) = config.get(key) {
            shell.print(format!("{} = {:?}", key, value));
        }
    }
    shell.detail(format!("global config: {}", ctx.config_path().display()));
    shell.detail(format!("project config: {}", ctx.project_config_path().display()));

    Ok(())
}

fn set_value(shell: &Shell, ctx: &GlobalContext, args: ConfigSetArgs) -> Result<()> {
    let path = if args.global {
        ctx.config_path()
    } else {
        ctx.project_config_path()
    };

    let result = set_config_value(&path, &args.key, &args.value)
        .with_context(|| format!("failed to update {}", path.display()))?;

    match result {
        SetResult::Added => shell.status(
            Status::Updated,
            format!("{} = {:?} ({})", args.key, args.value, path.display()),
        ),
        SetResult::Updated { previous } => shell.status(
            Status::Updated,
            format!(
                "{} {:?} -> {:?} ({})",
                args.key,
                previous,
                args.value,
                path.display()
            ),
        ),
        SetResult::Unchanged => shell.status(
            Status::Unchanged,
            format!("{} is already {:?}", args.key, args.value),
        ),
    }

    Ok(())
}
