// notifly-core: Incremental polling, enrichment and delivery for notifly

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod poller;
pub mod resolve;
pub mod retry;
pub mod watermark;

pub use config::{ControllerConfig, MonitorConfig};
pub use controller::Controller;
pub use error::CoreError;
pub use fetch::{Cursor, PAGE_SIZE, PageGrowth, collect_since};
pub use filter::AdminLoginFilter;
pub use model::{Alarm, Directories, Directory, Event, RecordKind, Timestamped};
pub use monitor::Monitor;
pub use notify::{
    BATCH_LIMIT, Batch, Channel, Channels, Entry, LogNotifier, Notifier, SlackNotifier, batch,
};
pub use poller::{CycleReport, Poller, next_delay};
pub use resolve::substitute;
pub use retry::RetryPolicy;
pub use watermark::WatermarkTracker;

// Re-export the API types callers need to build a controller config.
pub use notifly_api::{ControllerPlatform, Credentials, TlsMode, WebhookClient};
