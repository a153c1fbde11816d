// ── Poll loops ──
//
// One loop per record kind. Each wakes on a jittered interval, fetches
// every site's new records, enriches and filters them, delivers them in
// batches, then moves its watermark to the instant the cycle began.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::controller::Controller;
use crate::error::CoreError;
use crate::filter::AdminLoginFilter;
use crate::model::{Alarm, Event, RecordKind};
use crate::notify::{self, Entry, Notifier};
use crate::resolve::substitute;
use crate::watermark::WatermarkTracker;

/// Extra wait added to every interval, in whole seconds.
const JITTER_SECS: std::ops::RangeInclusive<u64> = 1..=30;

/// What one cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub kind: RecordKind,
    pub started_at: DateTime<Utc>,
    pub fetched: usize,
    pub suppressed: usize,
    pub delivered_batches: usize,
    pub failed_batches: usize,
    pub advanced: bool,
}

/// Interval plus a uniformly random 1–30 s.
pub fn next_delay(interval: Duration) -> Duration {
    let jitter = rand::rng().random_range(JITTER_SECS);
    interval.saturating_add(Duration::from_secs(jitter))
}

/// Everything a poll loop needs. Cheap to clone; both loops share the
/// controller, watermarks and notifier.
#[derive(Debug)]
pub struct Poller<N> {
    controller: Arc<Controller>,
    watermarks: Arc<WatermarkTracker>,
    notifier: Arc<N>,
    settings: Arc<MonitorConfig>,
    admin_logins: AdminLoginFilter,
}

impl<N> Clone for Poller<N> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            watermarks: Arc::clone(&self.watermarks),
            notifier: Arc::clone(&self.notifier),
            settings: Arc::clone(&self.settings),
            admin_logins: self.admin_logins.clone(),
        }
    }
}

impl<N: Notifier + 'static> Poller<N> {
    pub fn new(
        controller: Arc<Controller>,
        watermarks: Arc<WatermarkTracker>,
        notifier: Arc<N>,
        settings: MonitorConfig,
    ) -> Self {
        let admin_logins = AdminLoginFilter::new(&settings.admin_name);
        Self {
            controller,
            watermarks,
            notifier,
            settings: Arc::new(settings),
            admin_logins,
        }
    }

    pub fn watermarks(&self) -> &WatermarkTracker {
        &self.watermarks
    }

    pub fn settings(&self) -> &MonitorConfig {
        &self.settings
    }

    /// Run one fetch → filter → enrich → batch → deliver pass.
    ///
    /// A fetch failure aborts the cycle and leaves the watermark where it
    /// was. Delivery failures are logged per batch and do not stop the
    /// watermark from advancing.
    pub async fn run_cycle(&self, kind: RecordKind) -> Result<CycleReport, CoreError> {
        let started_at = Utc::now();
        let since = self.watermarks.current(kind);
        debug!(%kind, since = %since, "cycle started");

        let (entries, fetched, suppressed) = match kind {
            RecordKind::Alarms => {
                let entries = self.collect_alarms(since).await?;
                let fetched = entries.len();
                (entries, fetched, 0)
            }
            RecordKind::Events => self.collect_events(since).await?,
        };

        let mut delivered_batches = 0;
        let mut failed_batches = 0;
        for batch in notify::batch(entries) {
            match self.notifier.deliver(kind, &batch).await {
                Ok(()) => delivered_batches += 1,
                Err(e) => {
                    failed_batches += 1;
                    error!(%kind, entries = batch.len(), error = %e, "batch delivery failed");
                }
            }
        }

        let advanced = self.watermarks.advance(kind, started_at);

        Ok(CycleReport {
            kind,
            started_at,
            fetched,
            suppressed,
            delivered_batches,
            failed_batches,
            advanced,
        })
    }

    async fn collect_alarms(&self, since: DateTime<Utc>) -> Result<Vec<Entry>, CoreError> {
        let mut entries = Vec::new();
        for site in &self.settings.sites {
            let alarms = self
                .controller
                .alarms_since(site, since, self.settings.page_growth)
                .await?;
            debug!(site = %site, count = alarms.len(), "new alarms");
            entries.extend(alarms.into_iter().map(|alarm| alarm_entry(site, alarm)));
        }
        Ok(entries)
    }

    /// Returns the surviving entries, how many were fetched, and how
    /// many were suppressed as admin logins.
    async fn collect_events(
        &self,
        since: DateTime<Utc>,
    ) -> Result<(Vec<Entry>, usize, usize), CoreError> {
        let mut entries = Vec::new();
        let mut fetched = 0;
        let mut suppressed = 0;

        for site in &self.settings.sites {
            let dirs = self.controller.directories(site).await?;
            let events = self
                .controller
                .events_since(site, since, self.settings.page_growth)
                .await?;
            debug!(site = %site, count = events.len(), "new events");
            fetched += events.len();

            for event in events {
                let message = substitute(&event.message, &dirs.devices, &dirs.users);
                if self.admin_logins.is_suppressed(&message) {
                    debug!(site = %site, id = %event.id, "admin login suppressed");
                    suppressed += 1;
                    continue;
                }
                entries.push(event_entry(site, event, message));
            }
        }
        Ok((entries, fetched, suppressed))
    }

    /// Poll `kind` until `cancel` fires. Cancellation is only observed
    /// between cycles; a cycle in progress always finishes.
    pub async fn run(&self, kind: RecordKind, cancel: CancellationToken) {
        info!(
            %kind,
            sites = ?self.settings.sites,
            interval = %humantime::format_duration(self.settings.check_interval),
            "checker started"
        );

        loop {
            let delay = next_delay(self.settings.check_interval);
            debug!(%kind, delay = %humantime::format_duration(delay), "waiting for next cycle");

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {
                    match self.run_cycle(kind).await {
                        Ok(report) if report.failed_batches > 0 => warn!(
                            %kind,
                            fetched = report.fetched,
                            failed = report.failed_batches,
                            "cycle finished with undelivered batches"
                        ),
                        Ok(report) => info!(
                            %kind,
                            fetched = report.fetched,
                            suppressed = report.suppressed,
                            batches = report.delivered_batches,
                            "cycle finished"
                        ),
                        Err(e) => error!(
                            %kind,
                            status = ?e.status(),
                            error = %e,
                            "cycle aborted"
                        ),
                    }
                }
            }
        }

        info!(%kind, "checker quit");
    }

    /// Spawn the loop for `kind` on the runtime.
    pub fn spawn(&self, kind: RecordKind, cancel: CancellationToken) -> JoinHandle<()> {
        let poller = self.clone();
        tokio::spawn(async move { poller.run(kind, cancel).await })
    }
}

fn alarm_entry(site: &str, alarm: Alarm) -> Entry {
    info!(
        kind = "alarm",
        site,
        id = %alarm.id,
        key = alarm.key.as_deref().unwrap_or_default(),
        occurred_at = %alarm.occurred_at,
        "{}",
        alarm.message
    );
    Entry {
        site: site.to_owned(),
        kind: RecordKind::Alarms,
        occurred_at: alarm.occurred_at,
        host: alarm.host,
        message: alarm.message,
    }
}

fn event_entry(site: &str, event: Event, message: String) -> Entry {
    info!(
        kind = "event",
        site,
        id = %event.id,
        key = event.key.as_deref().unwrap_or_default(),
        occurred_at = %event.occurred_at,
        "{message}"
    );
    Entry {
        site: site.to_owned(),
        kind: RecordKind::Events,
        occurred_at: event.occurred_at,
        host: event.host,
        message,
    }
}
