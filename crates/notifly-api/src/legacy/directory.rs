// Legacy API directory endpoints
//
// Device and known-client listings used to turn MAC addresses into names.

use tracing::debug;

use crate::error::Error;
use crate::legacy::client::{Endpoint, LegacyClient};
use crate::legacy::models::{LegacyDeviceBasic, LegacyUser, Pagination};
use crate::session::SessionToken;

impl LegacyClient {
    /// List adopted devices with their names.
    ///
    /// `POST /api/s/{site}/stat/device-basic`
    pub async fn list_devices_basic(
        &self,
        site: &str,
        token: &SessionToken,
    ) -> Result<Vec<LegacyDeviceBasic>, Error> {
        debug!(site, "listing devices");
        self.post_site(site, Endpoint::DeviceBasic, token, &Pagination::default())
            .await
    }

    /// List every client the controller has ever seen.
    ///
    /// `POST /api/s/{site}/list/user`
    pub async fn list_users(
        &self,
        site: &str,
        token: &SessionToken,
    ) -> Result<Vec<LegacyUser>, Error> {
        debug!(site, "listing known clients");
        self.post_site(site, Endpoint::Users, token, &Pagination::default())
            .await
    }
}
