// Platform-specific code module (Linux)

mod fs;
mod login1;
mod notify_bus;
mod poll;
mod pulse;
mod uevent;

// Re-exports for cleaner imports
pub use fs::{statvfs, FsStats};
pub use login1::request_suspend;
pub use notify_bus::{NotificationBus, NotificationRequest};
pub use poll::wait_readable;
pub use pulse::{parse_sinks, PactlClient};
pub use uevent::{DeviceEvent, Received, UeventSocket};
