//! Aggregate CPU usage from `/proc/stat`.

use std::path::PathBuf;

use crate::core::history::HysteresisCounter;
use crate::core::metrics::{ColorTag, MetricSample};
use crate::error::{Result, StatusError};

/// `percent * cores` above this counts as one "high" second
const HIGH_LOAD_THRESHOLD: u64 = 80;
/// Sustained-high seconds before the block turns yellow
pub const YELLOW_AFTER_SECS: u32 = 30;
/// Sustained-high seconds before the block turns red
pub const RED_AFTER_SECS: u32 = 120;

/// The ten jiffy counters of the aggregate `cpu` line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuTimes {
    /// Parse the first `cpu ` line of a `/proc/stat` dump
    pub fn parse(stat: &str) -> Result<Self> {
        let line = stat
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or_else(|| StatusError::parse("no aggregate cpu line"))?;

        let fields: Vec<u64> = line
            .split_whitespace()
            .skip(1)
            .map(|f| f.parse::<u64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| StatusError::parse(format!("bad cpu counter: {}", e)))?;

        if fields.len() < 4 {
            return Err(StatusError::parse("truncated cpu line"));
        }
        let get = |i: usize| fields.get(i).copied().unwrap_or(0);

        Ok(Self {
            user: get(0),
            nice: get(1),
            system: get(2),
            idle: get(3),
            iowait: get(4),
            irq: get(5),
            softirq: get(6),
            steal: get(7),
            guest: get(8),
            guest_nice: get(9),
        })
    }

    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    pub fn nonidle_total(&self) -> u64 {
        self.user + self.nice + self.system + self.irq + self.softirq + self.steal
    }
}

/// CPU usage source with its previous-sample baseline and sustained-load counter
pub struct CpuSource {
    stat_path: PathBuf,
    core_count: u64,
    previous: CpuTimes,
    high_seconds: HysteresisCounter,
}

impl CpuSource {
    pub fn new(stat_path: PathBuf, core_count: usize) -> Self {
        Self {
            stat_path,
            core_count: core_count.max(1) as u64,
            previous: CpuTimes::default(),
            high_seconds: HysteresisCounter::new(),
        }
    }

    /// Seconds the CPU has been continuously above the high-load threshold
    pub fn sustained_high(&self) -> u32 {
        self.high_seconds.value()
    }

    pub fn sample(&mut self) -> MetricSample {
        let times = match std::fs::read_to_string(&self.stat_path)
            .map_err(StatusError::from)
            .and_then(|s| CpuTimes::parse(&s))
        {
            Ok(times) => times,
            Err(e) => {
                log::warn!("cpu: {}: {}", self.stat_path.display(), e);
                return MetricSample::plain("cpu usage error");
            }
        };
        self.update(times)
    }

    /// Fold one counter snapshot into the baseline and render it.
    ///
    /// The very first snapshot is measured against a zero baseline, which
    /// yields the since-boot average.
    pub fn update(&mut self, times: CpuTimes) -> MetricSample {
        let percent = usage_percent(&self.previous, &times);
        self.previous = times;

        let Some(percent) = percent else {
            return MetricSample::gray("cpu:  --%");
        };

        self.high_seconds
            .record(percent * self.core_count > HIGH_LOAD_THRESHOLD);

        let color = match self.high_seconds.value() {
            s if s > RED_AFTER_SECS => ColorTag::Red,
            s if s > YELLOW_AFTER_SECS => ColorTag::Yellow,
            _ => ColorTag::Gray,
        };

        MetricSample::new(format!("cpu: {:>3}%", percent), color)
    }
}

/// Busy percentage between two snapshots, `None` when no time elapsed
pub fn usage_percent(prev: &CpuTimes, cur: &CpuTimes) -> Option<u64> {
    let nonidle = cur.nonidle_total().saturating_sub(prev.nonidle_total());
    let idle = cur.idle_total().saturating_sub(prev.idle_total());
    let total = nonidle + idle;
    if total == 0 {
        return None;
    }
    Some(((nonidle as f64) * 100.0 / total as f64).round() as u64)
}
