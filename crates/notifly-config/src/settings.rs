// ── Validation and translation to core settings ──

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use strum::{Display, EnumString};
use url::Url;

use notifly_core::{
    ControllerConfig, ControllerPlatform, Credentials, MonitorConfig, PageGrowth, RetryPolicy,
    TlsMode,
};

use crate::{Config, ConfigError};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, colored when attached to a terminal.
    Pretty,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. "info" or "notifly_core=debug".
    pub level: String,
    pub format: LogFormat,
}

/// A delivery channel and what it needs.
#[derive(Debug, Clone)]
pub enum ChannelSettings {
    Slack {
        alarms_webhook: SecretString,
        events_webhook: SecretString,
    },
    Log,
}

impl ChannelSettings {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Slack { .. } => "slack",
            Self::Log => "log",
        }
    }
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub controller: ControllerConfig,
    pub monitor: MonitorConfig,
    pub channels: Vec<ChannelSettings>,
    pub logging: LoggingSettings,
}

/// Collects every problem instead of stopping at the first one.
#[derive(Default)]
struct Problems(Vec<String>);

impl Problems {
    fn push(&mut self, problem: impl Into<String>) {
        self.0.push(problem.into());
    }

    fn required<T: Clone>(&mut self, value: Option<&T>, key: &str) -> Option<T> {
        if value.is_none() {
            self.push(format!("{key} is required"));
        }
        value.cloned()
    }

    fn parse<T: FromStr>(&mut self, value: &str, key: &str, expected: &str) -> Option<T> {
        let parsed = value.parse().ok();
        if parsed.is_none() {
            self.push(format!("{key}: expected {expected}, got '{value}'"));
        }
        parsed
    }

    fn url(&mut self, value: &str, key: &str) -> Option<Url> {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
            Ok(url) => {
                self.push(format!(
                    "{key}: unsupported scheme '{}' (expected http or https)",
                    url.scheme()
                ));
                None
            }
            Err(e) => {
                self.push(format!("{key}: invalid URL '{value}': {e}"));
                None
            }
        }
    }
}

/// Rewrite logrus-style level names (`warning`, `fatal`, `panic`) that
/// `EnvFilter` would otherwise read as target names.
fn log_directive(level: &str) -> String {
    fn level_name(name: &str) -> &str {
        match name.trim().to_ascii_lowercase().as_str() {
            "warning" => "warn",
            "fatal" | "panic" => "error",
            _ => name.trim(),
        }
    }

    level
        .split(',')
        .map(|directive| match directive.split_once('=') {
            Some((target, name)) => format!("{}={}", target.trim(), level_name(name)),
            None => level_name(directive).to_owned(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Validate and translate into runtime settings, reporting every
    /// problem at once.
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let mut problems = Problems::default();

        if self.check_interval == 0 {
            problems.push("check_interval must be at least 1 minute");
        }
        if self.unifi.timeout == 0 {
            problems.push("unifi.timeout must be at least 1 second");
        }
        if self.session_ttl == 0 {
            problems.push("session_ttl must be at least 1 second");
        }
        if self.retry.attempts == 0 {
            problems.push("retry.attempts must be at least 1");
        }

        let format = problems.parse::<LogFormat>(&self.log_format, "log_format", "json or pretty");
        let platform = problems.parse::<ControllerPlatform>(
            &self.unifi.platform,
            "unifi.platform",
            "classic or unifi-os",
        );
        let page_growth =
            problems.parse::<PageGrowth>(&self.unifi.pagination, "unifi.pagination", "fixed or growing");

        let url = problems
            .required(non_empty(self.unifi.url.as_ref()), "unifi.url")
            .and_then(|u| problems.url(&u, "unifi.url"));

        if self.unifi.sites.is_empty() {
            problems.push("unifi.sites must name at least one site");
        }

        let username = problems.required(non_empty(self.unifi.username.as_ref()), "unifi.username");
        let password = problems.required(non_empty(self.unifi.password.as_ref()), "unifi.password");

        if let Some(ca) = &self.unifi.ca_cert {
            if !ca.exists() {
                problems.push(format!("unifi.ca_cert: {} does not exist", ca.display()));
            }
        }

        let channels = self.channels(&mut problems);

        if !problems.0.is_empty() {
            return Err(ConfigError::Validation {
                problems: problems.0,
            });
        }

        let (Some(url), Some(username), Some(password), Some(platform), Some(page_growth), Some(format)) =
            (url, username, password, platform, page_growth, format)
        else {
            return Err(ConfigError::Validation {
                problems: vec!["incomplete configuration".into()],
            });
        };

        let tls = match (&self.unifi.ca_cert, self.unifi.insecure) {
            (Some(ca), _) => TlsMode::CustomCa(ca.clone()),
            (None, true) => TlsMode::DangerAcceptInvalid,
            (None, false) => TlsMode::System,
        };

        let admin_name = non_empty(self.unifi.admin_name.as_ref())
            .cloned()
            .unwrap_or_else(|| username.clone());

        let controller = ControllerConfig {
            url,
            platform,
            credentials: Credentials {
                username,
                password: SecretString::from(password),
            },
            tls,
            timeout: Duration::from_secs(self.unifi.timeout),
            session_ttl: Duration::from_secs(self.session_ttl),
            retry: RetryPolicy {
                attempts: self.retry.attempts,
                base_backoff: Duration::from_millis(self.retry.backoff_ms),
            },
        };

        let monitor = MonitorConfig {
            sites: self.unifi.sites,
            check_interval: Duration::from_secs(self.check_interval.saturating_mul(60)),
            admin_name,
            page_growth,
        };

        Ok(Settings {
            controller,
            monitor,
            channels,
            logging: LoggingSettings {
                level: log_directive(&self.log_level),
                format,
            },
        })
    }

    fn channels(&self, problems: &mut Problems) -> Vec<ChannelSettings> {
        if self.notification_services.is_empty() {
            problems.push("notification_services must name at least one service (slack, log)");
        }

        let mut channels = Vec::new();
        for service in &self.notification_services {
            match service.to_ascii_lowercase().as_str() {
                "slack" => {
                    let alarms = problems.required(
                        non_empty(self.slack.alarms_webhook.as_ref()),
                        "slack.alarms_webhook",
                    );
                    let events = problems.required(
                        non_empty(self.slack.events_webhook.as_ref()),
                        "slack.events_webhook",
                    );
                    let alarms = alarms.filter(|u| problems.url(u, "slack.alarms_webhook").is_some());
                    let events = events.filter(|u| problems.url(u, "slack.events_webhook").is_some());
                    if let (Some(alarms), Some(events)) = (alarms, events) {
                        channels.push(ChannelSettings::Slack {
                            alarms_webhook: SecretString::from(alarms),
                            events_webhook: SecretString::from(events),
                        });
                    }
                }
                "log" => channels.push(ChannelSettings::Log),
                other => problems.push(format!(
                    "notification_services: unknown service '{other}' (expected slack or log)"
                )),
            }
        }
        channels
    }
}
