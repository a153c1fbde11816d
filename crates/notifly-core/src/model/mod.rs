// ── Domain model ──
//
// Records the pollers handle (alarms, events) and the MAC-to-name
// directories used to enrich them.

pub mod directory;
pub mod record;

pub use directory::{Directories, Directory};
pub use record::{Alarm, Event, RecordKind, Timestamped};
