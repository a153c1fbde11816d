// ── Notification batching and delivery ──
//
// Enriched records become `Entry`s, are cut into single-site batches of
// at most `BATCH_LIMIT`, and each batch goes to every configured channel.
// Delivery is best-effort per batch; one failed batch never blocks the
// next.

pub mod log;
pub mod slack;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::RecordKind;

pub use self::log::LogNotifier;
pub use self::slack::SlackNotifier;

/// Most entries one outbound message may carry.
pub const BATCH_LIMIT: usize = 20;

/// One line of a notification, tagged with the site it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub site: String,
    pub kind: RecordKind,
    pub occurred_at: DateTime<Utc>,
    pub host: Option<String>,
    pub message: String,
}

/// Up to `BATCH_LIMIT` entries, in the order they were fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub entries: Vec<Entry>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split `entries` into consecutive batches of at most `BATCH_LIMIT`.
/// A batch never spans two sites; order is preserved.
pub fn batch(entries: Vec<Entry>) -> Vec<Batch> {
    let mut batches = Vec::with_capacity(entries.len().div_ceil(BATCH_LIMIT));
    let mut current: Vec<Entry> = Vec::with_capacity(BATCH_LIMIT);

    for entry in entries {
        let full = current.len() == BATCH_LIMIT;
        let new_site = current.first().is_some_and(|first| first.site != entry.site);
        if full || new_site {
            batches.push(Batch {
                entries: std::mem::replace(&mut current, Vec::with_capacity(BATCH_LIMIT)),
            });
        }
        current.push(entry);
    }
    if !current.is_empty() {
        batches.push(Batch { entries: current });
    }
    batches
}

/// A delivery sink for notification batches.
pub trait Notifier: Send + Sync {
    /// Short channel name for logs ("slack", "log").
    fn name(&self) -> &'static str;

    fn deliver(
        &self,
        kind: RecordKind,
        batch: &Batch,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// A configured channel.
#[derive(Debug)]
pub enum Channel {
    Slack(SlackNotifier),
    Log(LogNotifier),
}

impl Notifier for Channel {
    fn name(&self) -> &'static str {
        match self {
            Self::Slack(n) => n.name(),
            Self::Log(n) => n.name(),
        }
    }

    async fn deliver(&self, kind: RecordKind, batch: &Batch) -> Result<(), CoreError> {
        match self {
            Self::Slack(n) => n.deliver(kind, batch).await,
            Self::Log(n) => n.deliver(kind, batch).await,
        }
    }
}

/// Fan-out over every configured channel.
///
/// Every channel is tried; failures are reported together.
#[derive(Debug, Default)]
pub struct Channels(Vec<Channel>);

impl Channels {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self(channels)
    }
}

impl Notifier for Channels {
    fn name(&self) -> &'static str {
        "channels"
    }

    async fn deliver(&self, kind: RecordKind, batch: &Batch) -> Result<(), CoreError> {
        let mut failures = Vec::new();
        for channel in &self.0 {
            if let Err(e) = channel.deliver(kind, batch).await {
                failures.push(e.to_string());
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Delivery {
                channel: self.name().to_owned(),
                message: failures.join("; "),
            })
        }
    }
}
