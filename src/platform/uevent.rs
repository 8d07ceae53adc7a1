//! Kernel uevent netlink socket, filtered to power-supply devices.

use std::collections::HashMap;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::error::{Result, StatusError};

/// Multicast group the kernel broadcasts raw uevents on
const KERNEL_EVENT_GROUP: u32 = 1;
const RECV_BUFFER: usize = 8192;
const POWER_SUPPLY: &str = "power_supply";

/// One device notification: identity plus its property map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEvent {
    pub action: String,
    pub devpath: String,
    pub subsystem: String,
    pub properties: HashMap<String, String>,
}

impl DeviceEvent {
    /// Parse a kernel uevent datagram: `action@devpath\0KEY=VALUE\0...`
    pub fn parse(datagram: &[u8]) -> Option<Self> {
        let mut parts = datagram
            .split(|&b| b == 0)
            .filter(|p| !p.is_empty())
            .map(String::from_utf8_lossy);

        let header = parts.next()?;
        // libudev re-broadcasts carry a binary header; not ours to parse
        if header.starts_with("libudev") {
            return None;
        }
        let (action, devpath) = header.split_once('@')?;

        let properties: HashMap<String, String> = parts
            .filter_map(|p| {
                p.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
            })
            .collect();

        Some(Self {
            action: action.to_string(),
            devpath: devpath.to_string(),
            subsystem: properties.get("SUBSYSTEM").cloned().unwrap_or_default(),
            properties,
        })
    }

    /// Kernel name of the device (`BAT0`, `AC`, ...)
    pub fn sysname(&self) -> &str {
        self.properties
            .get("POWER_SUPPLY_NAME")
            .map(String::as_str)
            .unwrap_or_else(|| self.devpath.rsplit('/').next().unwrap_or_default())
    }

    pub fn is_power_supply(&self) -> bool {
        self.subsystem == POWER_SUPPLY
    }
}

/// Non-blocking netlink socket delivering power-supply uevents.
///
/// The descriptor is closed when the value is dropped.
#[derive(Debug)]
pub struct UeventSocket {
    fd: OwnedFd,
}

impl UeventSocket {
    pub fn open() -> Result<Self> {
        // SAFETY: plain socket(2) call; the result is checked before use.
        let raw = unsafe {
            libc::socket(
                libc::AF_NETLINK,
                libc::SOCK_DGRAM | libc::SOCK_CLOEXEC | libc::SOCK_NONBLOCK,
                libc::NETLINK_KOBJECT_UEVENT,
            )
        };
        if raw < 0 {
            return Err(StatusError::event_source(format!(
                "socket: {}",
                io::Error::last_os_error()
            )));
        }
        // SAFETY: `raw` is a freshly created descriptor owned by nobody else.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        // SAFETY: sockaddr_nl is plain old data; all-zero is a valid value.
        let mut addr: libc::sockaddr_nl = unsafe { std::mem::zeroed() };
        addr.nl_family = libc::AF_NETLINK as libc::sa_family_t;
        addr.nl_groups = KERNEL_EVENT_GROUP;

        // SAFETY: `addr` outlives the call and the length matches its type.
        let ret = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                &addr as *const libc::sockaddr_nl as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_nl>() as libc::socklen_t,
            )
        };
        if ret < 0 {
            return Err(StatusError::event_source(format!(
                "bind: {}",
                io::Error::last_os_error()
            )));
        }

        Ok(Self { fd })
    }

    pub fn raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }

    /// Consume exactly one datagram
    pub fn receive(&self) -> Result<Received> {
        let mut buf = [0u8; RECV_BUFFER];
        // SAFETY: `buf` is valid for writes of its full length.
        let len = unsafe {
            libc::recv(
                self.fd.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
            )
        };
        if len < 0 {
            return recv_error(io::Error::last_os_error());
        }

        Ok(match DeviceEvent::parse(&buf[..len as usize]) {
            Some(event) if event.is_power_supply() => Received::Event(event),
            _ => Received::Ignored,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_fd(fd: OwnedFd) -> Self {
        Self { fd }
    }
}

/// What one read from the socket produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Event(DeviceEvent),
    /// Another subsystem's event, or nothing pending
    Ignored,
    /// The kernel dropped events; cached device state may be stale
    Overflow,
}

fn recv_error(err: io::Error) -> Result<Received> {
    if err.raw_os_error() == Some(libc::ENOBUFS) {
        log::warn!("device event queue overflowed, events were lost");
        return Ok(Received::Overflow);
    }
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(Received::Ignored),
        _ => Err(StatusError::event_source(format!("recv: {}", err))),
    }
}
