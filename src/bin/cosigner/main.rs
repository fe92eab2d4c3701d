//! cosigner CLI - Override Xcode code signing settings right before a build

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use miette::{GraphicalReportHandler, GraphicalTheme};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use cosigner::util::diagnostic::emit;
use cosigner::util::Shell;
use cosigner::CosignError;

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Arc<Shell>,
}

fn main() {
    let cli = Cli::parse();

    let shell = Arc::new(Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    ));

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cosigner=debug")
    } else if cli.quiet {
        EnvFilter::new("cosigner=error")
    } else {
        EnvFilter::new("cosigner=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    let global_opts = GlobalOptions { shell };

    if let Err(e) = run(cli.command, &global_opts) {
        report_error(&e, &global_opts.shell);
        std::process::exit(1);
    }
}

fn run(command: Commands, global_opts: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Apply(args) => commands::apply::execute(args, global_opts),
        Commands::Show(args) => commands::show::execute(args, global_opts),
        Commands::Targets(args) => commands::targets::execute(args, global_opts),
        Commands::Config(args) => commands::config::execute(args, global_opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn report_error(error: &anyhow::Error, shell: &Shell) {
    if shell.is_json() {
        shell.error(format!("{:#}", error));
        return;
    }

    match error.downcast_ref::<CosignError>() {
        Some(err) => {
            if let CosignError::Parse { source, .. } = err {
                render_source_error(&**source, shell.use_color());
            }
            emit(&err.to_diagnostic(), shell.use_color());
        }
        None => eprintln!("error: {:#}", error),
    }
}

/// Print a parse error with the offending source line underlined.
fn render_source_error(diagnostic: &dyn miette::Diagnostic, color: bool) {
    let handler = if color {
        GraphicalReportHandler::new()
    } else {
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
    };

    let mut rendered = String::new();
    if handler.render_report(&mut rendered, diagnostic).is_ok() {
        eprint!("{}", rendered);
    }
}
