//! `org.freedesktop.Notifications` service on the session bus.
//!
//! zbus answers calls on its own executor. Each `Notify` is forwarded over a
//! channel and a byte is written to a socket pair, so the status loop sees
//! the bus as a readable descriptor and drains requests on its own thread.

use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use zbus::zvariant::OwnedValue;

use crate::error::Result;

const BUS_NAME: &str = "org.freedesktop.Notifications";
const OBJECT_PATH: &str = "/org/freedesktop/Notifications";

/// A `Notify` call as received from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub app: String,
    pub summary: String,
    pub body: String,
    pub timeout_ms: i32,
}

struct NotificationServer {
    requests: Mutex<Sender<NotificationRequest>>,
    wake: UnixStream,
    next_id: AtomicU32,
}

#[zbus::interface(name = "org.freedesktop.Notifications")]
impl NotificationServer {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: String,
        replaces_id: u32,
        _app_icon: String,
        summary: String,
        body: String,
        _actions: Vec<String>,
        _hints: HashMap<String, OwnedValue>,
        expire_timeout: i32,
    ) -> u32 {
        log::debug!(
            "notify from {:?} (replaces {}): {:?} {:?} {}",
            app_name,
            replaces_id,
            summary,
            body,
            expire_timeout
        );

        let request = NotificationRequest {
            app: app_name,
            summary,
            body,
            timeout_ms: expire_timeout,
        };
        let sent = self
            .requests
            .lock()
            .map(|tx| tx.send(request).is_ok())
            .unwrap_or(false);
        if sent {
            // A full wake buffer still means the loop has a pending wakeup
            let _ = (&self.wake).write(&[1]);
        }

        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn get_capabilities(&self) -> Vec<String> {
        ["actions", "body", "persistence"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Live claim on the notification bus name. Dropping it releases the name
/// and closes the connection.
pub struct NotificationBus {
    _connection: zbus::blocking::Connection,
    requests: Receiver<NotificationRequest>,
    wake: UnixStream,
}

impl NotificationBus {
    pub fn connect() -> Result<Self> {
        let (reader, writer) = UnixStream::pair()?;
        reader.set_nonblocking(true)?;
        writer.set_nonblocking(true)?;
        let (tx, rx) = mpsc::channel();

        let server = NotificationServer {
            requests: Mutex::new(tx),
            wake: writer,
            next_id: AtomicU32::new(1),
        };

        let connection = zbus::blocking::connection::Builder::session()?
            .name(BUS_NAME)?
            .serve_at(OBJECT_PATH, server)?
            .build()?;

        log::info!("serving {} on the session bus", BUS_NAME);
        Ok(Self {
            _connection: connection,
            requests: rx,
            wake: reader,
        })
    }

    pub fn raw_fd(&self) -> RawFd {
        self.wake.as_raw_fd()
    }

    /// Clear the wakeup and hand back every request received so far
    pub fn drain(&mut self) -> Vec<NotificationRequest> {
        let mut buf = [0u8; 64];
        loop {
            match self.wake.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    log::warn!("notification wakeup: {}", e);
                    break;
                }
            }
        }
        self.requests.try_iter().collect()
    }
}
