//! nextlesson CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use nextlesson_cli::cli::{Cli, Command};
use nextlesson_cli::error::CliResult;
use nextlesson_cli::commands;
use nextlesson_core::{TracingConfig, init_tracing};
use nextlesson_providers::Timetable;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let service = Timetable::new(cli.untis_config())?;

    match cli.command {
        Command::Resolve { ref name } => commands::resolve::run(&service, name, cli.json).await,
        Command::Today { ref name } => commands::day::today(&service, name, cli.json).await,
        Command::Date { ref name, date } => {
            commands::day::for_date(&service, name, date, cli.json).await
        }
        Command::List => commands::list::run(&service, cli.json).await,
        Command::Watch {
            ref name,
            lead_minutes,
            no_notify,
        } => commands::watch::run(&service, name, lead_minutes, !no_notify).await,
    }
}
