//! NAMASTE terminology CLI.
//!
//! Exit codes: 0 on success or a found resolution, 1 when a resolution
//! finds nothing, 2 on any error.

use clap::{ColorChoice, Parser};
use namaste_cli::context::load_config;
use namaste_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{Answer, run_codesystem, run_lookup, run_materialize, run_translate};
use crate::summary::print_materialize_summary;

const EXIT_NOT_FOUND: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_ERROR);
    }
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(EXIT_ERROR);
        }
    };
    let exit_code = match &cli.command {
        Command::Materialize(args) => {
            let threshold = config.matching.publish_threshold;
            match run_materialize(args, config) {
                Ok(summaries) => {
                    print_materialize_summary(&summaries, threshold);
                    0
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    EXIT_ERROR
                }
            }
        }
        Command::Codesystem(args) => finish(run_codesystem(args, &config)),
        Command::Lookup(args) => finish(run_lookup(args, &config)),
        Command::Translate(args) => finish(run_translate(args, &config)),
    };
    std::process::exit(exit_code);
}

fn finish(outcome: anyhow::Result<Answer>) -> i32 {
    let answer = match outcome {
        Ok(answer) => answer,
        Err(error) => {
            eprintln!("error: {error:#}");
            return EXIT_ERROR;
        }
    };
    match serde_json::to_string_pretty(&answer.body) {
        Ok(text) => println!("{text}"),
        Err(error) => {
            eprintln!("error: render response: {error}");
            return EXIT_ERROR;
        }
    }
    if answer.found { 0 } else { EXIT_NOT_FOUND }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
