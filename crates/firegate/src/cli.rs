//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "firegate",
    version,
    about = "Fire-door watchdog for access-control portals",
    long_about = "Watches one door through the access-control portal and unlocks every \
                  managed door while it is open, locking them again once it returns to normal."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Settings file (JSON, or TOML by extension)
    #[arg(long, short = 'c', env = "FIREGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory for the daily log file (default: `logs/` beside the executable)
    #[arg(long, env = "FIREGATE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log to stderr only
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the fire door until interrupted
    Run(RunArgs),

    /// Validate the settings and print the resolved configuration
    Check,
}

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Stop cleanly after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub run_for: Option<u64>,
}
