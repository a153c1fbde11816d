// Writes each entry through `tracing`.

use tracing::info;

use crate::error::CoreError;
use crate::model::RecordKind;
use crate::notify::{Batch, Notifier};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, kind: RecordKind, batch: &Batch) -> Result<(), CoreError> {
        for entry in &batch.entries {
            info!(
                kind = kind.noun(),
                site = %entry.site,
                host = entry.host.as_deref().unwrap_or_default(),
                occurred_at = %entry.occurred_at,
                "{}",
                entry.message
            );
        }
        Ok(())
    }
}
