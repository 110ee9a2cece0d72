//! Shapey CLI - Command-line interface for spec-driven document reshaping
//!
//! This is the main entry point for the Shapey CLI application, providing
//! commands for shaping documents with a spec, running shape pipelines and
//! combining documents.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::io::IsTerminal;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e, !cli.no_color && std::io::stderr().is_terminal()),
    };

    control::set_override(cli.use_color(&config));

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, &config) {
        Ok(()) => process::exit(0),
        Err(e) => exit_with(&e, control::SHOULD_COLORIZE.should_colorize()),
    }
}

fn exit_with(e: &error::Error, use_color: bool) -> ! {
    eprintln!("{}", error::format_error(e, use_color));
    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }
    process::exit(e.exit_code());
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config) -> Result<()> {
    let timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(
        cli.output_format(config),
        cli.use_color(config),
        cli.quiet,
        cli.verbosity_level(),
    );

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    let result = match cli.command {
        Commands::Shape(args) => handlers::handle_shape(args, config, &mut output),
        Commands::Pipeline(args) => handlers::handle_pipeline(args, config, &mut output),
        Commands::Combine(args) => handlers::handle_combine(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    };
    timer.finish();
    result
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    logging_config.merge_with_file(
        config.logging.level.as_deref(),
        config.logging.format,
        verbosity,
    );
    logging_config.merge_with_env();

    // Quiet mode only reports errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
