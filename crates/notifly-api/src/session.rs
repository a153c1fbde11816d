// Session cache for the legacy API
//
// One `SessionManager` is shared by every poller. Refresh-or-reuse runs
// under a single async mutex so concurrent callers never race two logins
// past an expired session.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::auth::Credentials;
use crate::error::Error;
use crate::legacy::LegacyClient;

/// How long a login is trusted before a fresh one is forced.
///
/// Kept below the controller's own session lifetime so sessions are
/// replaced before the controller starts rejecting them.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(19 * 60);

/// Opaque session token taken from the login cookie.
///
/// On UniFi OS the login also hands out a CSRF token that every proxied
/// POST must echo. It rotates, so clones of one login share a single slot
/// and a rotation seen by any caller reaches the cached session too.
#[derive(Debug, Clone)]
pub struct SessionToken {
    cookie: SecretString,
    csrf: Arc<RwLock<Option<SecretString>>>,
}

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            cookie: SecretString::from(token.into()),
            csrf: Arc::new(RwLock::new(None)),
        }
    }

    /// Attach the CSRF token captured at login.
    #[must_use]
    pub fn with_csrf(self, csrf: impl Into<String>) -> Self {
        self.rotate_csrf(csrf);
        self
    }

    /// The raw token value, for the `Cookie` header.
    pub fn expose(&self) -> &str {
        self.cookie.expose_secret()
    }

    /// Current CSRF token, if the controller issued one.
    pub fn csrf(&self) -> Option<String> {
        self.csrf
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.expose_secret().to_owned())
    }

    /// Replace the CSRF token after the controller rotated it.
    pub(crate) fn rotate_csrf(&self, csrf: impl Into<String>) {
        *self.csrf.write().unwrap_or_else(PoisonError::into_inner) =
            Some(SecretString::from(csrf.into()));
    }
}

/// A cached login: token plus the instant it stops being trusted.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub expires_at: Instant,
}

impl Session {
    /// A session is valid while its expiration is still in the future.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Owns the controller client, the credentials, and the cached session.
#[derive(Debug)]
pub struct SessionManager {
    client: LegacyClient,
    credentials: Credentials,
    ttl: Duration,
    session: Mutex<Option<Session>>,
}

impl SessionManager {
    pub fn new(client: LegacyClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            ttl: DEFAULT_SESSION_TTL,
            session: Mutex::new(None),
        }
    }

    /// Override the session lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn client(&self) -> &LegacyClient {
        &self.client
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a valid session token, logging in first when there is no
    /// session or the cached one has expired.
    ///
    /// The lock is held across the login, so callers arriving while a
    /// login is in flight wait for it and reuse its result.
    pub async fn ensure_session(&self) -> Result<SessionToken, Error> {
        let mut guard = self.session.lock().await;

        if let Some(session) = guard.as_ref().filter(|s| s.is_valid_at(Instant::now())) {
            return Ok(session.token.clone());
        }

        debug!(username = %self.credentials.username, "session missing or expired, logging in");
        let token = self.client.login(&self.credentials).await?;
        let expires_at = Instant::now() + self.ttl;
        *guard = Some(Session {
            token: token.clone(),
            expires_at,
        });
        info!(ttl_secs = self.ttl.as_secs(), "controller session established");
        Ok(token)
    }

    /// Drop the cached session if it is still the one the controller
    /// rejected. A newer session set up by another caller is kept.
    pub async fn invalidate(&self, rejected: &SessionToken) {
        let mut guard = self.session.lock().await;
        if guard
            .as_ref()
            .is_some_and(|s| s.token.expose() == rejected.expose())
        {
            debug!("dropping rejected session");
            *guard = None;
        }
    }
}
