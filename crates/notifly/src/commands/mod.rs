//! Subcommand handlers and the wiring they share.

pub mod config_cmd;
pub mod once;
pub mod run;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use notifly_config::{ChannelSettings, Settings};
use notifly_core::{
    Channel, Channels, Controller, CoreError, LogNotifier, Poller, SlackNotifier, WatermarkTracker,
    WebhookClient,
};

use crate::error::CliError;

/// Build a poller whose watermarks start at `since`.
pub fn build_poller(settings: &Settings, since: DateTime<Utc>) -> Result<Poller<Channels>, CliError> {
    let controller = Controller::new(&settings.controller)?;
    let channels = build_channels(settings)?;

    Ok(Poller::new(
        Arc::new(controller),
        Arc::new(WatermarkTracker::starting_at(since)),
        Arc::new(channels),
        settings.monitor.clone(),
    ))
}

fn build_channels(settings: &Settings) -> Result<Channels, CliError> {
    let mut channels = Vec::with_capacity(settings.channels.len());
    for channel in &settings.channels {
        channels.push(match channel {
            ChannelSettings::Slack {
                alarms_webhook,
                events_webhook,
            } => {
                let client = WebhookClient::new(&settings.controller.transport())
                    .map_err(CoreError::from)?;
                Channel::Slack(SlackNotifier::new(
                    client,
                    alarms_webhook.clone(),
                    events_webhook.clone(),
                ))
            }
            ChannelSettings::Log => Channel::Log(LogNotifier),
        });
    }
    Ok(Channels::new(channels))
}
