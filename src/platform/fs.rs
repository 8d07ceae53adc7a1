// Platform-specific filesystem queries

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::error::{Result, StatusError};

/// The subset of `statvfs(3)` the disk block needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStats {
    /// Blocks available to unprivileged users
    pub available_blocks: u64,
    pub block_size: u64,
}

pub fn statvfs(path: &Path) -> Result<FsStats> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| StatusError::parse(format!("path contains NUL: {}", path.display())))?;

    // SAFETY: statvfs is plain old data; all-zero is a valid value.
    let mut buf: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: `c_path` is NUL-terminated and `buf` is a valid out pointer.
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), &mut buf) };
    if ret != 0 {
        return Err(StatusError::Io(io::Error::last_os_error()));
    }

    Ok(FsStats {
        available_blocks: buf.f_bavail as u64,
        block_size: buf.f_bsize as u64,
    })
}
