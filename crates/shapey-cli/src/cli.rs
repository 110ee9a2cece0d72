//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use shapey_core::{Mode, TransformsMode};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Shapey CLI - reshape JSON and YAML documents with declarative specs
///
/// A spec maps output fields to transforms, nested specs or literal values.
/// Reserved keys (`shapeyMode`, `shapeyTransforms`, `shapeyDebug`) inside the
/// spec select the shaping strategy; the flags below override them.
#[derive(Parser, Debug)]
#[command(
    name = "shapey",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SHAPEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or the config file's]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shape an input document with a spec
    Shape(ShapeArgs),

    /// Run an input document through a sequence of shapes
    Pipeline(PipelineArgs),

    /// Combine two documents (add numbers, concatenate strings and arrays, merge objects)
    Combine(CombineArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the shape command
#[derive(Parser, Debug)]
pub struct ShapeArgs {
    /// Path to the spec file (JSON or YAML)
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Path to the input document; reads stdin when omitted or `-`
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Which fields survive shaping (overrides `shapeyMode`)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// How transforms are applied (overrides `shapeyTransforms`)
    #[arg(short, long, value_enum)]
    pub transforms: Option<TransformsArg>,

    /// Report failing transforms as errors in the log
    #[arg(long)]
    pub debug: bool,

    /// Keep the untransformed value when a transform fails
    #[arg(long, conflicts_with = "debug")]
    pub skip_errors: bool,

    /// Save the shaped document to a file
    #[arg(long)]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the pipeline command
#[derive(Parser, Debug)]
pub struct PipelineArgs {
    /// Path to the stages file: an array of specs, transform references or constants
    #[arg(value_name = "STAGES")]
    pub stages: PathBuf,

    /// Path to the input document; reads stdin when omitted or `-`
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Save the result to a file
    #[arg(long)]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the combine command
#[derive(Parser, Debug)]
pub struct CombineArgs {
    /// Path to the left document
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Path to the right document
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,
}

/// Arguments for configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show(ConfigShowArgs),

    /// Write a default configuration file
    Init(ConfigInitArgs),
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Format to print the configuration in
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to `.shapey.yaml` or `.shapey.json`)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// File format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Shaping modes selectable from the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Keep every input field, shape the ones the spec names
    Loose,
    /// Emit only spec fields present in the input
    Strict,
    /// Emit every spec field
    SuperStrict,
    /// Keep every input field, apply transforms to the whole input
    SuperLoose,
    /// Keep only the input fields the spec names
    Keep,
    /// Drop the input fields the spec names
    Remove,
}

/// Transform application modes selectable from the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransformsArg {
    /// Follow the shaping mode
    Default,
    /// Transforms receive the field's own value
    Prop,
    /// Transforms receive the whole input
    Whole,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Output format from the flag, then the config file
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.output
            .or(config.output.format)
            .unwrap_or(OutputFormat::Human)
    }

    /// Check if colored output should be used
    pub fn use_color(&self, config: &Config) -> bool {
        !self.no_color && config.output.color && std::io::stdout().is_terminal()
    }
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Loose => Mode::Loose,
            ModeArg::Strict => Mode::Strict,
            ModeArg::SuperStrict => Mode::SuperStrict,
            ModeArg::SuperLoose => Mode::SuperLoose,
            ModeArg::Keep => Mode::Keep,
            ModeArg::Remove => Mode::Remove,
        }
    }
}

impl From<TransformsArg> for TransformsMode {
    fn from(transforms: TransformsArg) -> Self {
        match transforms {
            TransformsArg::Default => TransformsMode::Default,
            TransformsArg::Prop => TransformsMode::Prop,
            TransformsArg::Whole => TransformsMode::Whole,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
