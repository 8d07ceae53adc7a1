// statline library - public API

// Re-export error types
pub mod error;
pub use error::{Result, StatusError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::BarConfig;

// Initialize logging. stdout carries the bar protocol, so logs go to
// stderr and stay quiet unless RUST_LOG asks for more.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}
