//! One-minute load average.

use std::path::PathBuf;

use super::cpu::YELLOW_AFTER_SECS;
use crate::core::metrics::{ColorTag, MetricSample};
use crate::error::{Result, StatusError};

pub struct LoadSource {
    loadavg_path: PathBuf,
}

impl LoadSource {
    pub fn new(loadavg_path: PathBuf) -> Self {
        Self { loadavg_path }
    }

    /// `cpu_high_secs` comes from the CPU source so the two blocks do not
    /// both turn yellow for the same burst.
    pub fn sample(&self, cpu_high_secs: u32) -> MetricSample {
        match self.read() {
            Ok(load) => load_sample(load, cpu_high_secs),
            Err(e) => {
                log::warn!("load: {}: {}", self.loadavg_path.display(), e);
                MetricSample::plain("load: error")
            }
        }
    }

    fn read(&self) -> Result<f64> {
        let content = std::fs::read_to_string(&self.loadavg_path)?;
        let first = content
            .split_whitespace()
            .next()
            .ok_or_else(|| StatusError::parse("empty loadavg"))?;
        first
            .parse::<f64>()
            .map_err(|e| StatusError::parse(format!("bad load average {:?}: {}", first, e)))
    }
}

pub fn load_sample(load: f64, cpu_high_secs: u32) -> MetricSample {
    let color = if load > 2.0 && cpu_high_secs < YELLOW_AFTER_SECS {
        ColorTag::Yellow
    } else if load < 1.0 {
        ColorTag::Gray
    } else {
        ColorTag::Default
    };
    MetricSample::new(format!("load: {:.2}", load), color)
}
