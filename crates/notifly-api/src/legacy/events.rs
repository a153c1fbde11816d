// Legacy API event and alarm endpoints
//
// Paged reads of stat/event and stat/alarm. The controller returns both
// newest first; callers walk pages with a `Pagination` cursor.

use tracing::debug;

use crate::error::Error;
use crate::legacy::client::{Endpoint, LegacyClient};
use crate::legacy::models::{LegacyAlarm, LegacyEvent, Pagination};
use crate::session::SessionToken;

impl LegacyClient {
    /// Fetch one page of alarms.
    ///
    /// `POST /api/s/{site}/stat/alarm` with `{"_start": .., "_limit": ..}`
    pub async fn list_alarms(
        &self,
        site: &str,
        token: &SessionToken,
        page: Pagination,
    ) -> Result<Vec<LegacyAlarm>, Error> {
        debug!(site, start = page.start, limit = page.limit, "listing alarms");
        self.post_site(site, Endpoint::Alarms, token, &page).await
    }

    /// Fetch one page of events.
    ///
    /// `POST /api/s/{site}/stat/event` with `{"_start": .., "_limit": ..}`
    pub async fn list_events(
        &self,
        site: &str,
        token: &SessionToken,
        page: Pagination,
    ) -> Result<Vec<LegacyEvent>, Error> {
        debug!(site, start = page.start, limit = page.limit, "listing events");
        self.post_site(site, Endpoint::Events, token, &page).await
    }
}
