//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use notifly_config::ConfigError;
use notifly_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(notifly::config),
        help(
            "Settings come from the config file, NOTIFLY_* variables\n\
             (NOTIFLY_UNIFI__URL, ...) and the flat names UNIFI_URL, UNIFI_SITES,\n\
             UNIFI_USERNAME, UNIFI_PASSWORD, NOTIFICATION_SERVICES, SLACK_*_WEBHOOK.\n\
             Run: notifly config"
        )
    )]
    Config(#[from] ConfigError),

    #[error("Invalid log filter '{filter}': {reason}")]
    #[diagnostic(
        code(notifly::log_filter),
        help("Use a level (error, warn, info, debug, trace) or a directive like notifly_core=debug")
    )]
    LogFilter { filter: String, reason: String },

    #[error("Invalid controller setup: {message}")]
    #[diagnostic(code(notifly::setup))]
    Setup { message: String },

    // ── Controller ───────────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(notifly::auth_failed),
        help("Check unifi.username / unifi.password and unifi.platform (classic or unifi-os).")
    )]
    AuthFailed { message: String },

    #[error("Could not reach the controller: {message}")]
    #[diagnostic(
        code(notifly::connection_failed),
        help(
            "Check that the controller is running and reachable at unifi.url.\n\
             Self-signed certificates need unifi.insecure = true or unifi.ca_cert."
        )
    )]
    ConnectionFailed { message: String },

    #[error("{0}")]
    #[diagnostic(code(notifly::cycle))]
    Cycle(String),

    #[error("{failed} of {total} check(s) did not complete cleanly")]
    #[diagnostic(code(notifly::incomplete), help("See the log output above for details."))]
    Incomplete { failed: usize, total: usize },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::LogFilter { .. } | Self::Setup { .. } => exit_code::USAGE,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Cycle(_) | Self::Incomplete { .. } => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message, .. } => Self::AuthFailed { message },
            CoreError::Config { message } => Self::Setup { message },
            e @ CoreError::Fetch {
                unreachable: true, ..
            } => Self::ConnectionFailed {
                message: e.to_string(),
            },
            e => Self::Cycle(e.to_string()),
        }
    }
}
