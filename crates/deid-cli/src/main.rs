//! `deid`: hash identifying spreadsheet columns into a pseudonymous key.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use deid_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use deid_cli::commands::{run_columns, run_hash, run_preview, run_sheets};
use deid_cli::config::Config;
use deid_cli::logging::{LogConfig, LogFormat, init_logging};
use deid_cli::summary::{print_columns, print_hash_summary, print_preview, print_sheets};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load_optional(cli.config.as_deref())?;
    match &cli.command {
        Command::Sheets(args) => print_sheets(&run_sheets(args)?),
        Command::Columns(args) => print_columns(&run_columns(args, &config)?),
        Command::Preview(args) => {
            let session = run_preview(&args.sheet, &config)?;
            print_preview(&session, args.limit, args.show_data);
        }
        Command::Hash(args) => {
            let outcome = run_hash(args, &config)?;
            print_hash_summary(&outcome, args.preview);
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level(cli.verbosity.tracing_level_filter())
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level = match level {
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
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
