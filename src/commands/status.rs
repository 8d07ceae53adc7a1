//! Status line command handler.
//!
//! Streams the bar protocol to stdout until interrupted.

use std::io;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::{BarConfig, Scheduler, StatusLine};
use crate::platform::PactlClient;

/// Build the configuration the flags describe
pub fn config_from_matches(matches: &ArgMatches) -> BarConfig {
    BarConfig {
        show_wifi: !matches.get_flag("no-wifi"),
        notifications: !matches.get_flag("no-notifications"),
        ..BarConfig::default()
    }
}

/// Execute the status command
pub fn execute(matches: &ArgMatches) -> Result<ExitCode> {
    let config = config_from_matches(matches);

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))
        .context("Failed to install interrupt handler")?;

    let status = StatusLine::new(config.clone(), Box::new(PactlClient::new()));
    let mut scheduler = Scheduler::new(&config, status, io::stdout().lock(), stop);

    match scheduler.run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_fatal() => {
            log::error!("{}", e);
            Ok(ExitCode::from(1))
        }
        Err(e) => Err(e).context("Status line stopped"),
    }
}
