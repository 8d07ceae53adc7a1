//! The main loop: render a line, wait up to one interval for an event
//! source to wake us, handle what woke us, age the notification queue.

use std::io::Write;
use std::os::fd::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::config::BarConfig;
use super::notifications::Notification;
use super::power::PowerAction;
use super::status::StatusLine;
use crate::error::{Result, StatusError};
use crate::platform::{self, NotificationBus, Received, UeventSocket};
use crate::ui::LineRenderer;

/// An event source the loop can block on
pub enum Waitable {
    DeviceEvents(UeventSocket),
    NotificationBus(NotificationBus),
}

impl Waitable {
    fn raw_fd(&self) -> RawFd {
        match self {
            Waitable::DeviceEvents(socket) => socket.raw_fd(),
            Waitable::NotificationBus(bus) => bus.raw_fd(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Waitable::DeviceEvents(_) => "device events",
            Waitable::NotificationBus(_) => "notification bus",
        }
    }
}

pub struct Scheduler<W: Write> {
    status: StatusLine,
    renderer: LineRenderer<W>,
    waitables: Vec<Waitable>,
    interval: Duration,
    stop: Arc<AtomicBool>,
}

impl<W: Write> Scheduler<W> {
    /// Open the event sources the configuration asks for. A source that
    /// cannot be opened is logged and left out.
    pub fn new(config: &BarConfig, status: StatusLine, out: W, stop: Arc<AtomicBool>) -> Self {
        let mut waitables = Vec::new();

        if config.device_events {
            match UeventSocket::open() {
                Ok(socket) => waitables.push(Waitable::DeviceEvents(socket)),
                Err(e) => log::warn!("device events unavailable: {}", e),
            }
        }
        if config.notifications {
            match NotificationBus::connect() {
                Ok(bus) => waitables.push(Waitable::NotificationBus(bus)),
                Err(e) => log::warn!("notification service unavailable: {}", e),
            }
        }

        Self::with_waitables(config, status, out, stop, waitables)
    }

    pub fn with_waitables(
        config: &BarConfig,
        mut status: StatusLine,
        out: W,
        stop: Arc<AtomicBool>,
        waitables: Vec<Waitable>,
    ) -> Self {
        let device_events = waitables
            .iter()
            .any(|w| matches!(w, Waitable::DeviceEvents(_)));
        status.power_mut().start(device_events);

        Self {
            status,
            renderer: LineRenderer::new(out),
            waitables,
            interval: config.interval,
            stop,
        }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Run until the stop flag is raised. Returns an error only for fatal
    /// conditions: a closed output stream or a failed wait.
    pub fn run(&mut self) -> Result<()> {
        self.renderer.write_preamble()?;
        while !self.stop.load(Ordering::SeqCst) {
            self.run_cycle()?;
        }
        log::info!("stop requested, shutting down");
        Ok(())
    }

    /// One render, one wait, one aging step
    pub fn run_cycle(&mut self) -> Result<()> {
        let started = Instant::now();

        let line = self.status.render();
        self.renderer.write_line(&line.samples)?;
        for action in line.actions {
            self.perform(action);
        }

        if self.waitables.is_empty() {
            let remaining = self.interval.saturating_sub(started.elapsed());
            thread::sleep(remaining);
        } else {
            self.wait()?;
        }

        self.status.notifications_mut().tick();
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.renderer.into_inner()
    }

    fn perform(&mut self, action: PowerAction) {
        match action {
            PowerAction::Suspend => {
                log::warn!("battery critically low, suspending");
                if let Err(e) = platform::request_suspend() {
                    log::error!("suspend request failed: {}", e);
                }
            }
            PowerAction::LowBatteryWarning(pct) => {
                log::warn!("battery low: {}%", pct);
            }
        }
    }

    /// Block until something relevant arrives or one interval has passed.
    /// Readiness that turns out to be irrelevant (another subsystem's device
    /// event, a spurious bus wakeup) resumes the wait with the time left.
    fn wait(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.interval;
        let fds: Vec<RawFd> = self.waitables.iter().map(Waitable::raw_fd).collect();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let ready = platform::wait_readable(&fds, remaining).map_err(StatusError::Wait)?;
            if !ready.iter().any(|&r| r) {
                // Timed out, or interrupted by a signal
                return Ok(());
            }
            if self.dispatch(&ready) || Instant::now() >= deadline {
                return Ok(());
            }
        }
    }

    /// Handle every ready source. Returns whether anything changed that
    /// warrants a new line.
    fn dispatch(&mut self, ready: &[bool]) -> bool {
        let mut handled = false;
        let mut lost = Vec::new();

        for (index, waitable) in self.waitables.iter_mut().enumerate() {
            if !ready.get(index).copied().unwrap_or(false) {
                continue;
            }
            match waitable {
                Waitable::DeviceEvents(socket) => match socket.receive() {
                    Ok(Received::Event(event)) => {
                        self.status.power_mut().handle_event(event);
                        handled = true;
                    }
                    Ok(Received::Overflow) => {
                        self.status.power_mut().resync();
                        handled = true;
                    }
                    Ok(Received::Ignored) => {}
                    Err(e) => {
                        log::warn!("device event source failed: {}", e);
                        lost.push(index);
                    }
                },
                Waitable::NotificationBus(bus) => {
                    for request in bus.drain() {
                        self.status.notifications_mut().push(Notification::from_request(
                            &request.app,
                            &request.summary,
                            &request.body,
                            request.timeout_ms,
                        ));
                        handled = true;
                    }
                }
            }
        }

        for index in lost.into_iter().rev() {
            let waitable = self.waitables.remove(index);
            log::warn!("dropping {}", waitable.name());
            if matches!(waitable, Waitable::DeviceEvents(_)) {
                self.status.power_mut().event_source_lost();
            }
            handled = true;
        }
        handled
    }
}
