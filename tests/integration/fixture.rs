// Fake /proc and /sys trees for driving the sources end to end

use std::fs;
use std::path::{Path, PathBuf};

use statline::core::sources::{AudioServer, DiskSource, Sink, SinkList};
use statline::core::{BarConfig, StatusLine};
use statline::Result;
use tempfile::TempDir;

pub const NET_DEV_HEADER: &str = "Inter-|   Receive                                                |  Transmit\n face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n";

pub struct FakeHost {
    pub dir: TempDir,
}

impl FakeHost {
    pub fn new() -> Self {
        let host = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(host.proc_root().join("net")).unwrap();
        fs::create_dir_all(host.sys_root().join("class/net/lo")).unwrap();
        fs::create_dir_all(host.sys_root().join("class/power_supply")).unwrap();
        host.write_proc("stat", "cpu  100 0 100 800 0 0 0 0 0 0\ncpu0 100 0 100 800 0 0 0 0 0 0\n");
        host.write_proc("loadavg", "0.50 0.40 0.30 1/100 1234\n");
        host.write_proc(
            "meminfo",
            "MemTotal:        8000000 kB\nMemFree:         1000000 kB\nMemAvailable:    6000000 kB\n",
        );
        host.set_net_counters(&[]);
        host
    }

    pub fn proc_root(&self) -> PathBuf {
        self.dir.path().join("proc")
    }

    pub fn sys_root(&self) -> PathBuf {
        self.dir.path().join("sys")
    }

    pub fn config(&self) -> BarConfig {
        BarConfig::with_roots(self.proc_root(), self.sys_root())
    }

    pub fn write_proc(&self, relative: &str, content: &str) {
        write(&self.proc_root().join(relative), content);
    }

    /// `(device, rx bytes, tx bytes)` rows of `/proc/net/dev`
    pub fn set_net_counters(&self, rows: &[(&str, u64, u64)]) {
        let mut dev = NET_DEV_HEADER.to_string();
        for (name, rx, tx) in rows {
            dev.push_str(&format!(
                "{:>6}: {} 10 0 0 0 0 0 0 {} 10 0 0 0 0 0 0\n",
                name, rx, tx
            ));
        }
        self.write_proc("net/dev", &dev);
    }

    pub fn add_interface(&self, name: &str, wireless: bool, carrier: Option<bool>) {
        let dir = self.sys_root().join("class/net").join(name);
        fs::create_dir_all(&dir).unwrap();
        if wireless {
            fs::create_dir_all(dir.join("wireless")).unwrap();
        }
        self.set_carrier(name, carrier);
    }

    pub fn set_carrier(&self, name: &str, carrier: Option<bool>) {
        let path = self.sys_root().join("class/net").join(name).join("carrier");
        match carrier {
            Some(up) => write(&path, if up { "1\n" } else { "0\n" }),
            None => {
                let _ = fs::remove_file(path);
            }
        }
    }

    pub fn remove_interface(&self, name: &str) {
        fs::remove_dir_all(self.sys_root().join("class/net").join(name)).unwrap();
    }

    pub fn write_supply(&self, name: &str, files: &[(&str, &str)]) {
        let dir = self.sys_root().join("class/power_supply").join(name);
        for (file, content) in files {
            write(&dir.join(file), content);
        }
    }

    pub fn status_line(&self) -> StatusLine {
        StatusLine::with_disks(
            self.config(),
            DiskSource::with_mounts(Vec::new()),
            Box::new(FixedAudio::new(40, false)),
        )
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Audio server with a single default sink
pub struct FixedAudio {
    volume_percent: u32,
    muted: bool,
}

impl FixedAudio {
    pub fn new(volume_percent: u32, muted: bool) -> Self {
        Self {
            volume_percent,
            muted,
        }
    }
}

impl AudioServer for FixedAudio {
    fn sinks(&mut self) -> Result<SinkList> {
        Ok(SinkList {
            sinks: vec![Sink {
                name: "speakers".to_string(),
                volume_percent: self.volume_percent,
                muted: self.muted,
            }],
            default_sink: Some("speakers".to_string()),
        })
    }
}

pub fn texts(samples: &[statline::core::MetricSample]) -> Vec<String> {
    samples.iter().map(|s| s.text.clone()).collect()
}
