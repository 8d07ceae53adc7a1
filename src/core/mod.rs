// Core status-line logic

pub mod config;
pub mod history;
pub mod metrics;
pub mod notifications;
pub mod power;
pub mod scheduler;
pub mod sources;
pub mod status;

// Re-export commonly used items
pub use config::BarConfig;
pub use metrics::{ColorTag, MetricSample};
pub use notifications::{Notification, NotificationQueue};
pub use power::{PowerAction, PowerMode, PowerMonitor};
pub use scheduler::{Scheduler, Waitable};
pub use status::{RenderedLine, StatusLine};
