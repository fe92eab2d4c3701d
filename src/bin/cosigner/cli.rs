//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cosigner::util::ColorChoice;

/// cosigner - Override Xcode code signing settings right before a build
#[derive(Parser)]
#[command(name = "cosigner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write code signing settings into a target's build configuration
    Apply(ApplyArgs),

    /// Show the code signing settings of a target's build configuration
    Show(ShowArgs),

    /// List targets and their build configurations
    Targets(TargetsArgs),

    /// Inspect or edit cosigner configuration files
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Which project to open.
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Path to the .xcodeproj bundle (or its project.pbxproj)
    #[arg(long, env = "PROJECT_PATH", value_name = "PATH")]
    pub xcodeproj_path: Option<PathBuf>,
}

/// Which target and configuration to work on.
#[derive(Args, Debug)]
pub struct SelectionArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Name of the target to modify
    #[arg(long, env = "SCHEME")]
    pub scheme: Option<String>,

    /// Name of the build configuration to modify (e.g. Release)
    #[arg(long, env = "BUILD_CONFIGURATION", value_name = "NAME")]
    pub build_configuration: Option<String>,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Code signing style: Manual or Automatic [default: Manual]
    #[arg(long, env = "CODE_SIGN_STYLE", value_name = "STYLE")]
    pub code_sign_style: Option<String>,

    /// Code signing identity [default: "iPhone Distribution"]
    #[arg(long, env = "CODE_SIGN_IDENTITY", value_name = "IDENTITY")]
    pub code_sign_identity: Option<String>,

    /// Provisioning profile name
    #[arg(long, env = "PROVISIONING_PROFILE_SPECIFIER", value_name = "NAME")]
    pub profile_name: Option<String>,

    /// Provisioning profile UUID
    #[arg(long, env = "PROVISIONING_PROFILE", value_name = "UUID")]
    pub profile_uuid: Option<String>,

    /// Development team identifier
    #[arg(long, env = "TEAM_ID", value_name = "TEAM")]
    pub development_team: Option<String>,

    /// Product bundle identifier
    #[arg(long, env = "APP_IDENTIFIER", value_name = "ID")]
    pub bundle_identifier: Option<String>,

    /// Platform of the calling lane (ios, mac)
    #[arg(long, env = "FASTLANE_PLATFORM_NAME")]
    pub platform: Option<String>,

    /// Compute the changes without saving the project
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Args, Debug)]
pub struct TargetsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the merged configuration
    Show,

    /// Set a configuration value, e.g. `signing.profile_name "App Store"`
    Set(ConfigSetArgs),
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Dotted key, e.g. signing.development_team
    pub key: String,

    /// New value
    pub value: String,

    /// Write to ~/.cosigner/config.toml instead of the project config
    #[arg(long)]
    pub global: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
