//! Clap derive structures for the `notifly` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use notifly_core::RecordKind;

/// notifly -- forward UniFi alarms and events to chat
#[derive(Debug, Parser)]
#[command(
    name = "notifly",
    version,
    about = "Forward UniFi controller alarms and events to chat",
    long_about = "Polls a UniFi Network controller for new alarms and events on every\n\
        configured site, replaces device and client MAC addresses with their\n\
        names, and posts the results to Slack in batches.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, short = 'c', env = "NOTIFLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll alarms and events until interrupted
    Run,

    /// Run a single poll cycle and exit
    Once(OnceArgs),

    /// Print the resolved configuration with secrets masked
    Config,
}

#[derive(Debug, Args)]
pub struct OnceArgs {
    /// Which records to check
    #[arg(long, short = 'k', value_enum, default_value_t = KindArg::All)]
    pub kind: KindArg,

    /// Report records newer than this many minutes (defaults to the check interval)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub since_minutes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Alarms,
    Events,
    All,
}

impl KindArg {
    pub fn kinds(self) -> &'static [RecordKind] {
        match self {
            Self::Alarms => &[RecordKind::Alarms],
            Self::Events => &[RecordKind::Events],
            Self::All => &RecordKind::ALL,
        }
    }
}
