//! Memory usage with a burst detector on top of the level thresholds.

use std::path::PathBuf;

use crate::core::history::{RollingWindow, DEFAULT_WINDOW_SIZE};
use crate::core::metrics::{ColorTag, MetricSample};
use crate::error::{Result, StatusError};

/// Jump above the smoothed average that counts as a burst (512 MiB in kB)
const BURST_THRESHOLD_KB: u64 = 512 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kb: u64,
    pub available_kb: u64,
}

impl MemInfo {
    pub fn parse(meminfo: &str) -> Result<Self> {
        let mut total = None;
        let mut available = None;
        for line in meminfo.lines() {
            let mut parts = line.split_whitespace();
            let key = parts.next();
            let value = parts.next().and_then(|v| v.parse::<u64>().ok());
            match key {
                Some("MemTotal:") => total = value,
                Some("MemAvailable:") => available = value,
                _ => {}
            }
        }
        match (total, available) {
            (Some(total_kb), Some(available_kb)) if total_kb > 0 => Ok(Self {
                total_kb,
                available_kb,
            }),
            _ => Err(StatusError::parse("MemTotal/MemAvailable missing")),
        }
    }

    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.available_kb)
    }
}

pub struct MemorySource {
    meminfo_path: PathBuf,
    history: Option<RollingWindow<u64>>,
}

impl MemorySource {
    pub fn new(meminfo_path: PathBuf) -> Self {
        Self {
            meminfo_path,
            history: None,
        }
    }

    pub fn sample(&mut self) -> MetricSample {
        let info = match std::fs::read_to_string(&self.meminfo_path)
            .map_err(StatusError::from)
            .and_then(|s| MemInfo::parse(&s))
        {
            Ok(info) => info,
            Err(e) => {
                log::warn!("mem: {}: {}", self.meminfo_path.display(), e);
                return MetricSample::plain(format!(
                    "mem: error opening {}",
                    self.meminfo_path.display()
                ));
            }
        };
        self.update(info)
    }

    pub fn update(&mut self, info: MemInfo) -> MetricSample {
        let used = info.used_kb();

        let history = self
            .history
            .get_or_insert_with(|| RollingWindow::seeded(DEFAULT_WINDOW_SIZE, used));
        history.push(used);
        let smoothed = history.mean();

        let percent = (used as f64 * 100.0 / info.total_kb as f64).round() as u64;
        let burst = used.saturating_sub(smoothed) > BURST_THRESHOLD_KB;

        let color = if percent > 80 || burst {
            ColorTag::Red
        } else if percent < 40 {
            ColorTag::Gray
        } else {
            ColorTag::Default
        };

        MetricSample::new(format!("mem: {}%", percent), color)
    }
}
