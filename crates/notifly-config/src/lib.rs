//! Configuration for the notifly daemon.
//!
//! A TOML file plus environment overrides, merged with figment and
//! validated into the plain settings `notifly-core` runs on. The flat
//! variable names older deployments use (`UNIFI_URL`, `SLACK_ALARMS_WEBHOOK`,
//! ...) are accepted next to the nested `NOTIFLY_*` form.

mod de;
mod settings;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use settings::{ChannelSettings, LogFormat, LoggingSettings, Settings};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration:{}", format_problems(.problems))]
    Validation { problems: Vec<String> },

    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn format_problems(problems: &[String]) -> String {
    problems.iter().map(|p| format!("\n  - {p}")).collect()
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration as read from file and environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Minutes between poll cycles (before jitter).
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// Enabled delivery channels: "slack", "log".
    #[serde(default, deserialize_with = "de::string_list")]
    pub notification_services: Vec<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "json" or "pretty".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Seconds a controller login is reused.
    #[serde(default = "default_session_ttl")]
    pub session_ttl: u64,

    #[serde(default)]
    pub unifi: Unifi,

    #[serde(default)]
    pub slack: Slack,

    #[serde(default)]
    pub retry: Retry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            notification_services: Vec::new(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            session_ttl: default_session_ttl(),
            unifi: Unifi::default(),
            slack: Slack::default(),
            retry: Retry::default(),
        }
    }
}

/// Controller connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Unifi {
    /// Controller base URL (e.g., "https://192.168.1.1:8443").
    #[serde(default, deserialize_with = "de::opt_string")]
    pub url: Option<String>,

    /// Sites to watch; a list or a comma-separated string.
    #[serde(default, deserialize_with = "de::string_list")]
    pub sites: Vec<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub password: Option<String>,

    /// "classic" or "unifi-os".
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Accept self-signed controller certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// PEM CA bundle to trust instead of the system store.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Administrator whose console logins are not reported.
    /// Defaults to `username`.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub admin_name: Option<String>,

    /// "fixed" or "growing".
    #[serde(default = "default_pagination")]
    pub pagination: String,
}

impl Default for Unifi {
    fn default() -> Self {
        Self {
            url: None,
            sites: Vec::new(),
            username: None,
            password: None,
            platform: default_platform(),
            insecure: default_insecure(),
            ca_cert: None,
            timeout: default_timeout(),
            admin_name: None,
            pagination: default_pagination(),
        }
    }
}

/// Slack incoming webhooks, one per record kind.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Slack {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub alarms_webhook: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub events_webhook: Option<String>,
}

/// Backoff for transient controller failures.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Retry {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_check_interval() -> u64 {
    1
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "json".into()
}
fn default_session_ttl() -> u64 {
    19 * 60
}
fn default_platform() -> String {
    "classic".into()
}
fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_pagination() -> String {
    "fixed".into()
}
fn default_attempts() -> u32 {
    3
}
fn default_backoff_ms() -> u64 {
    500
}

const REDACTED: &str = "********";

impl Config {
    /// Copy with passwords and webhook URLs masked, for display.
    pub fn redacted(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| REDACTED.to_owned());
        let mut copy = self.clone();
        copy.unifi.password = mask(&self.unifi.password);
        copy.slack.alarms_webhook = mask(&self.slack.alarms_webhook);
        copy.slack.events_webhook = mask(&self.slack.events_webhook);
        copy
    }

    /// Render as TOML with secrets masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.redacted())?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "notifly", "notifly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("notifly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Flat variable names and the keys they set.
const FLAT_ENV: &[(&str, &str)] = &[
    ("CHECK_INTERVAL", "check_interval"),
    ("NOTIFICATION_SERVICES", "notification_services"),
    // Misspelled name existing deployments still export.
    ("NOTIFCATION_SERVICES", "notification_services"),
    ("LOG_LEVEL", "log_level"),
    ("LOG_FORMAT", "log_format"),
    ("UNIFI_URL", "unifi.url"),
    ("UNIFI_SITES", "unifi.sites"),
    ("UNIFI_USERNAME", "unifi.username"),
    ("UNIFI_PASSWORD", "unifi.password"),
    ("UNIFI_PLATFORM", "unifi.platform"),
    ("UNIFI_INSECURE", "unifi.insecure"),
    ("UNIFI_CA_CERT", "unifi.ca_cert"),
    ("UNIFI_TIMEOUT", "unifi.timeout"),
    ("UNIFI_ADMIN_NAME", "unifi.admin_name"),
    ("UNIFI_PAGINATION", "unifi.pagination"),
    ("SLACK_ALARMS_WEBHOOK", "slack.alarms_webhook"),
    ("SLACK_EVENTS_WEBHOOK", "slack.events_webhook"),
];

fn flat_env() -> Env {
    Env::raw().filter_map(|key| {
        FLAT_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
    })
}

/// Build the layered figment: defaults, TOML file, `NOTIFLY_*`
/// environment (`__` for nesting), then the flat variable names.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NOTIFLY_").split("__"))
        .merge(flat_env())
}

/// Load the merged configuration.
///
/// An explicit `path` must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let config: Config = figment(&path).extract()?;
    Ok(config)
}

/// Load and validate in one step.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    load_config(path)?.into_settings()
}
