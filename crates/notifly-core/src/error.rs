// ── Core error types ──
//
// The failure taxonomy the poll loops act on. Transport-level
// `notifly_api::Error`s are folded into these with the site and endpoint
// that produced them, so every log line can say where a cycle broke.

use thiserror::Error;

use notifly_api::Endpoint;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Login failed or the controller kept rejecting the session.
    /// Aborts the current cycle; the next cycle logs in again.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        status: Option<u16>,
        message: String,
    },

    /// Transport, status, envelope or parse failure on a site endpoint.
    /// Aborts the current cycle for that record kind.
    #[error("Fetching {endpoint} for site '{site}' failed: {message}")]
    Fetch {
        site: String,
        endpoint: String,
        status: Option<u16>,
        /// No response at all, as opposed to one that could not be used.
        unreachable: bool,
        message: String,
    },

    /// A notification batch could not be delivered.
    #[error("Delivery via {channel} failed: {message}")]
    Delivery { channel: String, message: String },

    /// Invalid runtime configuration (bad URL, unreadable CA, ...).
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Attach site/endpoint context to an API error.
    pub fn from_api(site: &str, endpoint: Endpoint, err: notifly_api::Error) -> Self {
        let status = err.status();
        let unreachable = err.is_unreachable();
        match err {
            notifly_api::Error::Authentication { message, .. } => Self::AuthenticationFailed {
                status,
                message,
            },
            notifly_api::Error::SessionExpired => Self::AuthenticationFailed {
                status,
                message: format!("controller rejected session for {endpoint} on site '{site}'"),
            },
            other => Self::Fetch {
                site: site.to_owned(),
                endpoint: endpoint.to_string(),
                status,
                unreachable,
                message: other.to_string(),
            },
        }
    }

    pub fn delivery(channel: &str, err: &notifly_api::Error) -> Self {
        Self::Delivery {
            channel: channel.to_owned(),
            message: err.to_string(),
        }
    }

    /// HTTP status associated with the failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { status, .. } | Self::Fetch { status, .. } => *status,
            Self::Delivery { .. } | Self::Config { .. } => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

impl From<notifly_api::Error> for CoreError {
    fn from(err: notifly_api::Error) -> Self {
        match err {
            notifly_api::Error::Authentication { status, message } => Self::AuthenticationFailed {
                status: Some(status),
                message,
            },
            notifly_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            notifly_api::Error::Tls(msg) => Self::Config {
                message: format!("TLS error: {msg}"),
            },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
