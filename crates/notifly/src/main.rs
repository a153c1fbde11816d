mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use notifly_config::{LogFormat, LoggingSettings, Settings};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = notifly_config::load_config(cli.config.as_deref())?;

    match cli.command {
        // Printing the config must work even when it does not validate.
        Command::Config => commands::config_cmd::handle(&config),
        Command::Run => {
            let settings = prepare(config.into_settings()?, cli.verbose)?;
            commands::run::handle(settings).await
        }
        Command::Once(args) => {
            let settings = prepare(config.into_settings()?, cli.verbose)?;
            commands::once::handle(settings, &args).await
        }
    }
}

fn prepare(settings: Settings, verbosity: u8) -> Result<Settings, CliError> {
    init_tracing(&settings.logging, verbosity)?;
    tracing::debug!(
        sites = ?settings.monitor.sites,
        channels = settings.channels.len(),
        "configuration loaded"
    );
    Ok(settings)
}

/// `RUST_LOG` wins; otherwise the configured level, raised by `-v`.
fn init_tracing(logging: &LoggingSettings, verbosity: u8) -> Result<(), CliError> {
    let directive = match verbosity {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive).map_err(|e| CliError::LogFilter {
            filter: directive.to_owned(),
            reason: e.to_string(),
        })?,
    };

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
    Ok(())
}
