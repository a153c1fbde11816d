// ── Per-kind watermarks ──
//
// One timestamp per record kind, shared by every site. Held in memory
// only; a restart starts again from "now".

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::model::RecordKind;

#[derive(Debug, Default)]
pub struct WatermarkTracker {
    marks: DashMap<RecordKind, DateTime<Utc>>,
}

impl WatermarkTracker {
    /// Both kinds start at `t`.
    pub fn starting_at(t: DateTime<Utc>) -> Self {
        let marks = DashMap::new();
        for kind in RecordKind::ALL {
            marks.insert(kind, t);
        }
        Self { marks }
    }

    /// Records at or before this instant have already been reported.
    pub fn current(&self, kind: RecordKind) -> DateTime<Utc> {
        self.marks
            .get(&kind)
            .map_or(DateTime::<Utc>::MIN_UTC, |m| *m)
    }

    /// Move the watermark forward to `t`. Returns `false` and leaves the
    /// mark untouched when `t` is not newer.
    pub fn advance(&self, kind: RecordKind, t: DateTime<Utc>) -> bool {
        let mut entry = self.marks.entry(kind).or_insert(DateTime::<Utc>::MIN_UTC);
        if t > *entry {
            *entry = t;
            debug!(%kind, watermark = %t, "watermark advanced");
            true
        } else {
            false
        }
    }
}
