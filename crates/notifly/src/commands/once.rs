//! `notifly once`: a single cycle per requested kind, then exit.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info};

use notifly_config::Settings;

use crate::cli::OnceArgs;
use crate::commands::build_poller;
use crate::error::CliError;

pub async fn handle(settings: Settings, args: &OnceArgs) -> Result<(), CliError> {
    let lookback = match args.since_minutes {
        Some(minutes) => i64::try_from(minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .unwrap_or(TimeDelta::MAX),
        None => TimeDelta::from_std(settings.monitor.check_interval).unwrap_or(TimeDelta::MAX),
    };
    let since = Utc::now()
        .checked_sub_signed(lookback)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let poller = build_poller(&settings, since)?;
    let kinds = args.kind.kinds();

    let mut failed = 0;
    for &kind in kinds {
        match poller.run_cycle(kind).await {
            Ok(report) => {
                info!(
                    %kind,
                    fetched = report.fetched,
                    suppressed = report.suppressed,
                    batches = report.delivered_batches,
                    failed_batches = report.failed_batches,
                    "check finished"
                );
                if report.failed_batches > 0 {
                    failed += 1;
                }
            }
            // A single requested kind reports its own error and exit code.
            Err(e) if kinds.len() == 1 => return Err(e.into()),
            Err(e) => {
                error!(%kind, status = ?e.status(), error = %e, "check failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Incomplete {
            failed,
            total: kinds.len(),
        });
    }
    Ok(())
}
