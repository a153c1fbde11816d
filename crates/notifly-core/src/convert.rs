// ── API-to-domain type conversions ──
//
// Bridges raw `notifly_api` legacy records into the domain types the
// pollers work with. Timestamps fall back from `datetime` to the epoch
// millisecond `time` field; a record with neither sorts as infinitely old.

use chrono::{DateTime, Utc};

use notifly_api::{LegacyAlarm, LegacyEvent};

use crate::model::{Alarm, Event};

fn occurred_at(datetime: Option<DateTime<Utc>>, time_ms: Option<i64>) -> DateTime<Utc> {
    datetime
        .or_else(|| time_ms.and_then(DateTime::from_timestamp_millis))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl From<LegacyAlarm> for Alarm {
    fn from(raw: LegacyAlarm) -> Self {
        Self {
            occurred_at: occurred_at(raw.datetime, raw.time),
            id: raw.id,
            key: raw.key,
            message: raw.msg.unwrap_or_default(),
            host: raw.host,
        }
    }
}

impl From<LegacyEvent> for Event {
    fn from(raw: LegacyEvent) -> Self {
        Self {
            occurred_at: occurred_at(raw.datetime, raw.time),
            id: raw.id,
            key: raw.key,
            message: raw.msg.unwrap_or_default(),
            host: raw.host,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn event_time_falls_back_to_millis() {
        let raw: LegacyEvent = serde_json::from_value(json!({
            "_id": "e1",
            "msg": "AP[aa:bb:cc:00:00:01] was disconnected",
            "time": 1_718_447_400_000_i64
        }))
        .expect("valid event");

        let event = Event::from(raw);
        assert_eq!(event.occurred_at.to_rfc3339(), "2024-06-15T10:30:00+00:00");
        assert_eq!(event.message, "AP[aa:bb:cc:00:00:01] was disconnected");
    }

    #[test]
    fn alarm_without_timestamp_is_oldest() {
        let raw: LegacyAlarm =
            serde_json::from_value(json!({ "_id": "a1", "msg": "??" })).expect("valid alarm");
        assert_eq!(Alarm::from(raw).occurred_at, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn alarm_keeps_key_and_host() {
        let raw: LegacyAlarm = serde_json::from_value(json!({
            "_id": "a2",
            "key": "EVT_IPS_IpsAlert",
            "msg": "IPS Alert",
            "host": "unifi.lan",
            "datetime": "2024-06-15T10:30:00Z",
            "src_ip": "203.0.113.9"
        }))
        .expect("valid alarm");

        let alarm = Alarm::from(raw);
        assert_eq!(alarm.key.as_deref(), Some("EVT_IPS_IpsAlert"));
        assert_eq!(alarm.host.as_deref(), Some("unifi.lan"));
        assert_eq!(alarm.message, "IPS Alert");
    }
}
