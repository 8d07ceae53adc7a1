use std::path::PathBuf;
use std::time::Duration;

/// Filesystem types whose mount points get a free-space block
pub const DEFAULT_MOUNT_FS_TYPES: &[&str] = &["ext4", "ext3", "btrfs", "xfs", "f2fs"];

/// Runtime configuration for the status line.
///
/// Thresholds are fixed constants in each source; this only carries what
/// differs between a real host and a test fixture, plus the CLI toggles.
#[derive(Debug, Clone)]
pub struct BarConfig {
    /// Root of the proc filesystem (`/proc`)
    pub proc_root: PathBuf,
    /// Root of sysfs (`/sys`)
    pub sys_root: PathBuf,
    /// Length of one render cycle
    pub interval: Duration,
    pub show_wifi: bool,
    /// Claim `org.freedesktop.Notifications` on the session bus
    pub notifications: bool,
    /// Open the kernel power-supply event socket
    pub device_events: bool,
    pub mount_fs_types: Vec<String>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            sys_root: PathBuf::from("/sys"),
            interval: Duration::from_secs(1),
            show_wifi: true,
            notifications: true,
            device_events: true,
            mount_fs_types: DEFAULT_MOUNT_FS_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl BarConfig {
    /// Configuration rooted at a fake `/proc` and `/sys`, with every
    /// OS-level collaborator switched off
    pub fn with_roots<P: Into<PathBuf>, S: Into<PathBuf>>(proc_root: P, sys_root: S) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
            notifications: false,
            device_events: false,
            ..Default::default()
        }
    }

    pub fn proc_path(&self, relative: &str) -> PathBuf {
        self.proc_root.join(relative)
    }

    pub fn net_class_dir(&self) -> PathBuf {
        self.sys_root.join("class").join("net")
    }

    pub fn power_supply_dir(&self) -> PathBuf {
        self.sys_root.join("class").join("power_supply")
    }

    pub fn net_device_path(&self, device: &str, file: &str) -> PathBuf {
        self.net_class_dir().join(device).join(file)
    }

    pub fn is_monitored_fs(&self, fs_type: &str) -> bool {
        self.mount_fs_types.iter().any(|t| t == fs_type)
    }
}
