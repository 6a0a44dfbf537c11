mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Hold the guard so the log file is flushed on every exit path.
    let log_guard = logging::init(&cli.global);

    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "firegate exiting");
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    drop(log_guard);
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command.unwrap_or(Command::Run(cli::RunArgs::default())) {
        Command::Run(args) => commands::run::handle(args, &cli.global).await,
        Command::Check => commands::check::handle(&cli.global),
    }
}
