// Legacy API authentication
//
// Cookie-based session login. The controller answers a successful login
// with a session cookie; its value is handed back to the caller as a
// `SessionToken` instead of living in a shared cookie jar. UniFi OS adds
// an `X-CSRF-Token` header, which travels inside the same token.

use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::Error;
use crate::legacy::client::{CSRF_HEADER, LegacyClient};
use crate::session::SessionToken;

impl LegacyClient {
    /// Authenticate with the controller using username/password.
    ///
    /// The login endpoint differs by platform:
    /// - UniFi OS: `POST /api/auth/login`
    /// - Standalone: `POST /api/login`
    ///
    /// Fails with [`Error::Authentication`] on a non-2xx status or when the
    /// response carries no session cookie.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, Error> {
        let url = self.login_url()?;

        debug!("logging into controller at {}", url);

        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let csrf = resp
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned);
        let cookie_name = self.platform().session_cookie();
        let token = resp
            .cookies()
            .find(|c| c.name() == cookie_name && !c.value().is_empty())
            .map(|c| c.value().to_owned());
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Error::Authentication {
                status: status.as_u16(),
                message: format!("login rejected: {body}"),
            });
        }

        match token {
            Some(token) => {
                debug!(csrf = csrf.is_some(), "login successful");
                let token = SessionToken::new(token);
                Ok(match csrf {
                    Some(csrf) => token.with_csrf(csrf),
                    None => token,
                })
            }
            None => Err(Error::Authentication {
                status: status.as_u16(),
                message: format!("no {cookie_name} cookie in login response: {body}"),
            }),
        }
    }
}
