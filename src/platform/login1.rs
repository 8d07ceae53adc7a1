//! Outbound calls to systemd-logind.

use crate::error::Result;

/// Ask logind to suspend the machine (interactive authorisation allowed)
pub fn request_suspend() -> Result<()> {
    let connection = zbus::blocking::Connection::system()?;
    connection.call_method(
        Some("org.freedesktop.login1"),
        "/org/freedesktop/login1",
        Some("org.freedesktop.login1.Manager"),
        "Suspend",
        &(true,),
    )?;
    Ok(())
}
