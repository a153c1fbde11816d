// ── Runtime configuration consumed by the core ──
//
// Plain values, already validated. Loading and merging file/env sources
// lives in `notifly-config`; the core only sees these structs.

use std::time::Duration;

use url::Url;

use notifly_api::{ControllerPlatform, Credentials, TlsMode, TransportConfig};

use crate::fetch::PageGrowth;
use crate::retry::RetryPolicy;

/// How to reach and authenticate against one controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub url: Url,
    pub platform: ControllerPlatform,
    pub credentials: Credentials,
    pub tls: TlsMode,
    pub timeout: Duration,
    pub session_ttl: Duration,
    pub retry: RetryPolicy,
}

impl ControllerConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}

/// What the poll loops watch and how often.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub sites: Vec<String>,
    pub check_interval: Duration,
    /// Administrator whose own console logins are not reported.
    pub admin_name: String,
    pub page_growth: PageGrowth,
}

impl MonitorConfig {
    pub fn new(sites: Vec<String>, admin_name: impl Into<String>) -> Self {
        Self {
            sites,
            check_interval: Duration::from_secs(60),
            admin_name: admin_name.into(),
            page_growth: PageGrowth::default(),
        }
    }
}
