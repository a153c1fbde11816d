// notifly-api: Async client for the UniFi controller's legacy API and chat webhooks

pub mod auth;
pub mod error;
pub mod legacy;
pub mod session;
pub mod transport;
pub mod webhook;

pub use auth::{ControllerPlatform, Credentials};
pub use error::Error;
pub use legacy::models::{
    LegacyAlarm, LegacyDeviceBasic, LegacyEvent, LegacyUser, Pagination,
};
pub use legacy::{Endpoint, LegacyClient};
pub use session::{DEFAULT_SESSION_TTL, Session, SessionManager, SessionToken};
pub use transport::{TlsMode, TransportConfig};
pub use webhook::{SlackAttachment, SlackField, SlackMessage, WebhookClient};
