//! Free space per mounted persistent filesystem.

use std::path::{Path, PathBuf};

use sysinfo::Disks;

use crate::core::config::BarConfig;
use crate::core::metrics::{ColorTag, MetricSample};
use crate::error::Result;
use crate::platform::statvfs;

pub struct DiskSource {
    fs_types: Vec<String>,
    mounts: Vec<PathBuf>,
    stale: bool,
}

impl DiskSource {
    pub fn new(config: &BarConfig) -> Self {
        Self {
            fs_types: config.mount_fs_types.clone(),
            mounts: Vec::new(),
            stale: true,
        }
    }

    /// Source with a fixed mount list, no enumeration
    pub fn with_mounts(mounts: Vec<PathBuf>) -> Self {
        Self {
            fs_types: Vec::new(),
            mounts,
            stale: false,
        }
    }

    pub fn mounts(&self) -> &[PathBuf] {
        &self.mounts
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Render every monitored mount point. A failed query marks the mount
    /// list stale so it is enumerated again next cycle.
    pub fn sample_all(&mut self) -> Vec<MetricSample> {
        if self.stale {
            self.refresh_mounts();
        }

        let mut samples = Vec::with_capacity(self.mounts.len());
        for mount in &self.mounts {
            match free_gb(mount) {
                Ok(gb) => samples.push(disk_sample(mount, gb)),
                Err(e) => {
                    log::warn!("statvfs {}: {}", mount.display(), e);
                    self.stale = true;
                }
            }
        }
        samples
    }

    fn refresh_mounts(&mut self) {
        let disks = Disks::new_with_refreshed_list();
        let mut mounts: Vec<PathBuf> = disks
            .iter()
            .filter(|disk| {
                let fs = disk.file_system().to_string_lossy();
                self.fs_types.iter().any(|t| t.as_str() == &*fs)
            })
            .map(|disk| disk.mount_point().to_path_buf())
            .collect();
        mounts.sort();
        mounts.dedup();

        log::debug!("monitored mounts: {:?}", mounts);
        self.mounts = mounts;
        self.stale = false;
    }
}

fn free_gb(mount: &Path) -> Result<f64> {
    let stats = statvfs(mount)?;
    Ok(stats.available_blocks as f64 * stats.block_size as f64 / 1_000_000_000.0)
}

pub fn disk_sample(mount: &Path, gb_free: f64) -> MetricSample {
    let mount = mount.display();
    if gb_free < 1.0 {
        MetricSample::new(format!("{} {:.1} GB", mount, gb_free), ColorTag::Red)
    } else if gb_free < 5.0 {
        MetricSample::new(format!("{} {:.1} GB", mount, gb_free), ColorTag::Yellow)
    } else {
        MetricSample::new(format!("{} {:.0} GB", mount, gb_free), ColorTag::Gray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_thresholds() {
        let root = Path::new("/");
        assert_eq!(disk_sample(root, 0.42), MetricSample::red("/ 0.4 GB"));
        assert_eq!(
            disk_sample(root, 3.31),
            MetricSample::new("/ 3.3 GB", ColorTag::Yellow)
        );
        assert_eq!(disk_sample(root, 123.6), MetricSample::gray("/ 124 GB"));
    }

    #[test]
    fn test_vanished_mount_marks_list_stale() {
        let mut disks = DiskSource::with_mounts(vec![PathBuf::from(
            "/nonexistent/statline-test-mount",
        )]);
        assert!(disks.sample_all().is_empty());
        assert!(disks.is_stale());
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_mount_renders() {
        let mut disks = DiskSource::with_mounts(vec![PathBuf::from("/")]);
        let samples = disks.sample_all();
        assert_eq!(samples.len(), 1);
        assert!(samples[0].text.starts_with("/ "));
        assert!(samples[0].text.ends_with(" GB"));
        assert!(!disks.is_stale());
    }
}
