// ── Controller access for the poll loops ──
//
// Wraps the shared `SessionManager` with the request discipline every
// site call follows: reuse or refresh the session, retry transient
// failures, and log in again once when the controller rejects the
// session mid-flight.

use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use notifly_api::{Endpoint, LegacyClient, Pagination, SessionManager, SessionToken};

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::fetch::{PageGrowth, collect_since};
use crate::model::{Alarm, Directories, Directory, Event};
use crate::retry::RetryPolicy;

/// Shared handle to one controller.
#[derive(Debug)]
pub struct Controller {
    sessions: SessionManager,
    retry: RetryPolicy,
}

impl Controller {
    pub fn new(config: &ControllerConfig) -> Result<Self, CoreError> {
        let client = LegacyClient::new(config.url.clone(), config.platform, &config.transport())?;
        let sessions = SessionManager::new(client, config.credentials.clone())
            .with_ttl(config.session_ttl);
        Ok(Self::from_parts(sessions, config.retry))
    }

    pub fn from_parts(sessions: SessionManager, retry: RetryPolicy) -> Self {
        Self { sessions, retry }
    }

    /// Run one site request with a valid session.
    async fn call<T, F, Fut>(&self, site: &str, endpoint: Endpoint, op: F) -> Result<T, CoreError>
    where
        F: Fn(SessionToken) -> Fut,
        Fut: Future<Output = Result<T, notifly_api::Error>>,
    {
        let wrap = |e| CoreError::from_api(site, endpoint, e);

        let token = self.sessions.ensure_session().await.map_err(wrap)?;
        match self.retry.run(|| op(token.clone())).await {
            Err(e) if e.is_auth_expired() => {
                warn!(site, %endpoint, "session rejected, logging in again");
                self.sessions.invalidate(&token).await;
                let token = self.sessions.ensure_session().await.map_err(wrap)?;
                self.retry.run(|| op(token.clone())).await.map_err(wrap)
            }
            other => other.map_err(wrap),
        }
    }

    /// One page of alarms for `site`.
    pub async fn alarms_page(&self, site: &str, page: Pagination) -> Result<Vec<Alarm>, CoreError> {
        let client = self.sessions.client();
        let raw = self
            .call(site, Endpoint::Alarms, |token| async move {
                client.list_alarms(site, &token, page).await
            })
            .await?;
        Ok(raw.into_iter().map(Alarm::from).collect())
    }

    /// One page of events for `site`.
    pub async fn events_page(&self, site: &str, page: Pagination) -> Result<Vec<Event>, CoreError> {
        let client = self.sessions.client();
        let raw = self
            .call(site, Endpoint::Events, |token| async move {
                client.list_events(site, &token, page).await
            })
            .await?;
        Ok(raw.into_iter().map(Event::from).collect())
    }

    /// Every alarm on `site` newer than `since`, newest first.
    pub async fn alarms_since(
        &self,
        site: &str,
        since: DateTime<Utc>,
        growth: PageGrowth,
    ) -> Result<Vec<Alarm>, CoreError> {
        collect_since(|page| self.alarms_page(site, page), since, growth).await
    }

    /// Every event on `site` newer than `since`, newest first.
    pub async fn events_since(
        &self,
        site: &str,
        since: DateTime<Utc>,
        growth: PageGrowth,
    ) -> Result<Vec<Event>, CoreError> {
        collect_since(|page| self.events_page(site, page), since, growth).await
    }

    /// Current device and known-client directories for `site`.
    pub async fn directories(&self, site: &str) -> Result<Directories, CoreError> {
        let client = self.sessions.client();
        let devices = self
            .call(site, Endpoint::DeviceBasic, |token| async move {
                client.list_devices_basic(site, &token).await
            })
            .await?;
        let users = self
            .call(site, Endpoint::Users, |token| async move {
                client.list_users(site, &token).await
            })
            .await?;

        let dirs = Directories {
            devices: Directory::from_devices(&devices),
            users: Directory::from_users(&users),
        };
        debug!(
            site,
            devices = dirs.devices.len(),
            users = dirs.users.len(),
            "directories loaded"
        );
        Ok(dirs)
    }
}
