// ── Slack incoming webhooks ──
//
// One webhook per record kind. Each batch becomes a single message with
// one attachment per entry.

use secrecy::SecretString;
use tracing::debug;

use notifly_api::{SlackAttachment, SlackField, SlackMessage, WebhookClient};

use crate::error::CoreError;
use crate::model::RecordKind;
use crate::notify::{Batch, Entry, Notifier};

const ATTACHMENT_COLOR: &str = "danger";

#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: WebhookClient,
    alarms_webhook: SecretString,
    events_webhook: SecretString,
}

impl SlackNotifier {
    pub fn new(
        client: WebhookClient,
        alarms_webhook: SecretString,
        events_webhook: SecretString,
    ) -> Self {
        Self {
            client,
            alarms_webhook,
            events_webhook,
        }
    }

    fn webhook(&self, kind: RecordKind) -> &SecretString {
        match kind {
            RecordKind::Alarms => &self.alarms_webhook,
            RecordKind::Events => &self.events_webhook,
        }
    }

    /// The payload posted for `batch`.
    pub fn message(kind: RecordKind, batch: &Batch) -> SlackMessage {
        SlackMessage {
            attachments: batch
                .entries
                .iter()
                .map(|entry| attachment(kind, entry))
                .collect(),
        }
    }
}

fn attachment(kind: RecordKind, entry: &Entry) -> SlackAttachment {
    let text = match (kind, entry.host.as_deref()) {
        (RecordKind::Events, Some(host)) if !host.is_empty() => {
            format!("<!channel> {host}: {}", entry.message)
        }
        _ => format!("<!channel> {}", entry.message),
    };

    SlackAttachment {
        color: ATTACHMENT_COLOR.to_owned(),
        text,
        ts: entry.occurred_at.timestamp(),
        fields: vec![SlackField {
            title: "Site".to_owned(),
            value: entry.site.clone(),
            short: true,
        }],
    }
}

impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn deliver(&self, kind: RecordKind, batch: &Batch) -> Result<(), CoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        debug!(%kind, entries = batch.len(), "posting batch to slack");
        self.client
            .post_json(self.webhook(kind), &Self::message(kind, batch))
            .await
            .map_err(|e| CoreError::delivery(self.name(), &e))
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn entry(host: Option<&str>) -> Entry {
        Entry {
            site: "default".into(),
            kind: RecordKind::Events,
            occurred_at: DateTime::from_timestamp(1_718_447_400, 0).expect("valid timestamp"),
            host: host.map(str::to_owned),
            message: "AP[Office AP] was disconnected".into(),
        }
    }

    #[test]
    fn event_payload_prefixes_host() {
        let batch = Batch {
            entries: vec![entry(Some("unifi.lan")), entry(None)],
        };
        let payload = serde_json::to_value(SlackNotifier::message(RecordKind::Events, &batch))
            .expect("serializable");

        assert_eq!(
            payload,
            json!({
                "attachments": [
                    {
                        "color": "danger",
                        "text": "<!channel> unifi.lan: AP[Office AP] was disconnected",
                        "ts": 1_718_447_400,
                        "fields": [{ "title": "Site", "value": "default", "short": true }]
                    },
                    {
                        "color": "danger",
                        "text": "<!channel> AP[Office AP] was disconnected",
                        "ts": 1_718_447_400,
                        "fields": [{ "title": "Site", "value": "default", "short": true }]
                    }
                ]
            })
        );
    }

    #[test]
    fn alarm_payload_never_prefixes_host() {
        let batch = Batch {
            entries: vec![entry(Some("unifi.lan"))],
        };
        let message = SlackNotifier::message(RecordKind::Alarms, &batch);
        assert_eq!(
            message.attachments[0].text,
            "<!channel> AP[Office AP] was disconnected"
        );
    }
}
