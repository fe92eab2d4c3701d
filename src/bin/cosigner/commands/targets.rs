//! `cosigner targets` command

use anyhow::Result;

use crate::cli::TargetsArgs;
use crate::commands::project_path;
use crate::GlobalOptions;
use cosigner::ops::list_targets;
use cosigner::util::GlobalContext;
use cosigner::Project;

pub fn execute(args: TargetsArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();
    let path = project_path(&ctx, &config, &args.project)?;

    let project = Project::open(&path)?;
    let targets = list_targets(&project)?;

    if shell.is_json() {
        for summary in &targets {
            shell.json_event(&serde_json::json!({
                "reason": "target",
                "name": summary.target.name,
                "id": summary.target.id,
                "isa": summary.target.isa,
                "configurations": summary.configurations,
            }));
        }
        return Ok(());
    }

    if targets.is_empty() {
        shell.note(format!("{} has no targets", project.path().display()));
    }
    for summary in &targets {
        shell.print(format!(
            "{} ({})",
            summary.target.name, summary.target.isa
        ));
        shell.print(format!("    {}", summary.configurations.join(", ")));
    }

    Ok(())
}
