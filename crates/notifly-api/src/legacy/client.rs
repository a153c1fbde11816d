// Legacy API HTTP client
//
// Wraps `reqwest::Client` with UniFi-specific URL construction, session
// cookie injection, envelope unwrapping, and platform-aware path prefixing.
// Endpoint modules (events, directory) are implemented as inherent methods
// in separate files to keep this module focused on transport mechanics.

use reqwest::header::COOKIE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::Display;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::models::LegacyResponse;
use crate::session::SessionToken;
use crate::transport::TransportConfig;

/// Header UniFi OS issues at login and expects back on proxied POSTs.
pub(crate) const CSRF_HEADER: &str = "x-csrf-token";
/// Header carrying a rotated CSRF token.
const UPDATED_CSRF_HEADER: &str = "x-updated-csrf-token";

/// Site-scoped endpoints this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Endpoint {
    #[strum(to_string = "stat/alarm")]
    Alarms,
    #[strum(to_string = "stat/event")]
    Events,
    #[strum(to_string = "stat/device-basic")]
    DeviceBasic,
    #[strum(to_string = "list/user")]
    Users,
}

/// Raw HTTP client for the UniFi controller's legacy API.
///
/// Handles the `{ data: [], meta: { rc, msg } }` envelope, site-scoped
/// URL construction, and platform-aware path prefixing. All methods return
/// unwrapped `data` payloads -- the envelope is stripped before the caller
/// sees it.
///
/// The client holds no session state of its own: every site request takes
/// the token to present, which keeps session caching in one place
/// ([`SessionManager`](crate::SessionManager)).
#[derive(Debug, Clone)]
pub struct LegacyClient {
    http: reqwest::Client,
    base_url: Url,
    platform: ControllerPlatform,
}

impl LegacyClient {
    /// Create a new legacy client from a `TransportConfig`.
    ///
    /// The `base_url` should be the controller root (e.g.
    /// `https://192.168.1.1` for UniFi OS or `https://controller:8443`
    /// for standalone).
    pub fn new(
        base_url: Url,
        platform: ControllerPlatform,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, platform))
    }

    /// Create a legacy client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, platform: ControllerPlatform) -> Self {
        Self {
            http,
            base_url,
            platform,
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured controller platform.
    pub fn platform(&self) -> ControllerPlatform {
        self.platform
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn root(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Login URL: `{base}{login_path}`. The login path already includes
    /// any platform prefix.
    pub(crate) fn login_url(&self) -> Result<Url, Error> {
        Ok(Url::parse(&format!(
            "{}{}",
            self.root(),
            self.platform.login_path()
        ))?)
    }

    /// Build a site-scoped URL: `{base}{prefix}/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, site: &str, endpoint: Endpoint) -> Result<Url, Error> {
        Ok(Url::parse(&format!(
            "{}{}/api/s/{}/{}",
            self.root(),
            self.platform.legacy_prefix(),
            site,
            endpoint
        ))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST a JSON body to a site endpoint with the session cookie and
    /// unwrap the legacy envelope.
    pub(crate) async fn post_site<T: DeserializeOwned>(
        &self,
        site: &str,
        endpoint: Endpoint,
        token: &SessionToken,
        body: &impl Serialize,
    ) -> Result<Vec<T>, Error> {
        let url = self.site_url(site, endpoint)?;
        debug!(site, %endpoint, "POST {}", url);

        let cookie = format!("{}={}", self.platform.session_cookie(), token.expose());
        let mut request = self.http.post(url).header(COOKIE, cookie).json(body);
        if let (ControllerPlatform::UnifiOs, Some(csrf)) = (self.platform, token.csrf()) {
            request = request.header(CSRF_HEADER, csrf);
        }

        let resp = request.send().await.map_err(Error::Transport)?;

        if let Some(rotated) = resp
            .headers()
            .get(UPDATED_CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
        {
            trace!("CSRF token rotated");
            token.rotate_csrf(rotated);
        }

        Self::parse_envelope(resp).await
    }

    /// Parse the `{ meta, data }` envelope, returning `data` on success
    /// or an `Error::LegacyApi` if `meta.rc != "ok"`.
    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        trace!(len = body.len(), "legacy envelope received");

        let envelope: LegacyResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        match envelope.meta.rc.as_str() {
            "ok" => Ok(envelope.data),
            _ => Err(Error::LegacyApi {
                message: envelope
                    .meta
                    .msg
                    .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
            }),
        }
    }
}
