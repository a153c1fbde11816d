// ── Alarm and event domain types ──

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

/// The two independently polled record streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Alarms,
    Events,
}

impl RecordKind {
    pub const ALL: [Self; 2] = [Self::Alarms, Self::Events];

    /// Singular noun used in log lines ("alarm", "event").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Alarms => "alarm",
            Self::Events => "event",
        }
    }
}

/// Anything positioned on the controller's timeline.
pub trait Timestamped {
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Alarm raised by the controller (IDS/IPS hit, device alert, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alarm {
    pub id: String,
    pub occurred_at: DateTime<Utc>,
    pub key: Option<String>,
    pub message: String,
    pub host: Option<String>,
}

/// Operational event from the controller's event log. Hardware
/// addresses appear inline in `message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub occurred_at: DateTime<Utc>,
    pub key: Option<String>,
    pub message: String,
    pub host: Option<String>,
}

impl Timestamped for Alarm {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl Timestamped for Event {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
