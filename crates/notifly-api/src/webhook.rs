// Outbound chat webhooks
//
// Slack-compatible incoming-webhook payloads and a thin poster. The
// webhook URL itself is the credential, so it is passed as a secret.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::transport::TransportConfig;

/// A Slack incoming-webhook message made of attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlackMessage {
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackAttachment {
    pub color: String,
    pub text: String,
    /// Epoch seconds shown as the attachment footer time.
    pub ts: i64,
    pub fields: Vec<SlackField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// Posts JSON payloads to webhook URLs.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_webhook_client()?,
        })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST `body` as JSON. Any 2xx answer counts as delivered.
    pub async fn post_json(&self, url: &SecretString, body: &impl Serialize) -> Result<(), Error> {
        let url = url::Url::parse(url.expose_secret())?;
        debug!(host = url.host_str().unwrap_or_default(), "posting webhook");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Webhook {
            status: status.as_u16(),
            body,
        })
    }
}
