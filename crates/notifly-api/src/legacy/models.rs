// Legacy API request/response types
//
// Models for the UniFi controller's legacy JSON API. All responses are wrapped
// in the `LegacyResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence across firmware versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// Every legacy endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "count": 2, "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Pagination ───────────────────────────────────────────────────────

/// Request body for paged `stat/*` and `list/*` queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(rename = "_start")]
    pub start: u32,
    #[serde(rename = "_limit")]
    pub limit: u32,
}

impl Pagination {
    pub const fn new(start: u32, limit: u32) -> Self {
        Self { start, limit }
    }
}

// ── Alarm ────────────────────────────────────────────────────────────

/// Alarm object from `stat/alarm` (IDS/IPS hits, device alerts, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyAlarm {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
    /// Milliseconds since the epoch; fallback when `datetime` is absent.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub src_ip: Option<String>,
    #[serde(default)]
    pub src_mac: Option<String>,
    #[serde(default)]
    pub dest_ip: Option<String>,
    #[serde(default)]
    pub dst_mac: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub catname: Option<String>,
    #[serde(default)]
    pub inner_alert_signature: Option<String>,
    #[serde(default)]
    pub inner_alert_category: Option<String>,
    #[serde(default)]
    pub inner_alert_severity: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Event ────────────────────────────────────────────────────────────

/// Event object from `stat/event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyEvent {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    /// Client MAC for wireless/wired client events.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ssid: Option<String>,
    /// Access point MAC.
    #[serde(default)]
    pub ap: Option<String>,
    /// Gateway MAC.
    #[serde(default)]
    pub gw: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub src_mac: Option<String>,
    #[serde(default)]
    pub dst_mac: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Directory entries ────────────────────────────────────────────────

/// Slim device object from `stat/device-basic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyDeviceBasic {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub adopted: Option<bool>,
    #[serde(default)]
    pub disabled: Option<bool>,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(default)]
    pub state: Option<i32>,
}

/// Known client ("user") from `list/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyUser {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub oui: Option<String>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    #[serde(default)]
    pub first_seen: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
}
