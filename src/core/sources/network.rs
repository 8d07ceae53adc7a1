//! Per-interface throughput from `/proc/net/dev`.
//!
//! Each interface keeps its own pair of rolling windows. The state is
//! dropped the moment the carrier goes down or the device disappears, so a
//! reconnect re-baselines instead of producing a rate spike from a stale
//! counter.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::config::BarConfig;
use crate::core::history::{RollingWindow, DEFAULT_WINDOW_SIZE};
use crate::core::metrics::{ColorTag, MetricSample};
use crate::error::{Result, StatusError};

/// Below this many kB per sample in both directions the block is dimmed
const QUIET_KB: u64 = 512;
/// Above this many kB per sample the rate is shown in mb
const MB_SWITCH_KB: u64 = 100;

/// Interfaces worth a block, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceList {
    pub ethernet: Vec<String>,
    pub wireless: Vec<String>,
}

impl InterfaceList {
    /// Enumerate `<sys>/class/net`, skipping loopback
    pub fn scan(config: &BarConfig) -> Self {
        let mut list = Self::default();
        let entries = match std::fs::read_dir(config.net_class_dir()) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("cannot list network interfaces: {}", e);
                return list;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name == "lo" {
                continue;
            }
            if is_wireless(config, &name) {
                list.wireless.push(name);
            } else {
                list.ethernet.push(name);
            }
        }
        list.ethernet.sort();
        list.wireless.sort();
        list
    }

    pub fn contains(&self, device: &str) -> bool {
        self.ethernet.iter().chain(&self.wireless).any(|d| d == device)
    }
}

fn is_wireless(config: &BarConfig, device: &str) -> bool {
    if config.net_device_path(device, "wireless").is_dir() {
        return true;
    }
    std::fs::read_to_string(config.net_device_path(device, "uevent"))
        .map(|uevent| uevent.lines().any(|l| l.trim() == "DEVTYPE=wlan"))
        .unwrap_or(false)
}

/// Whether the interface reports link (`carrier` reads `1`)
pub fn carrier_up(config: &BarConfig, device: &str) -> Option<bool> {
    std::fs::read_to_string(config.net_device_path(device, "carrier"))
        .ok()
        .map(|s| s.starts_with('1'))
}

/// History for one interface
#[derive(Debug, Clone)]
pub struct InterfaceState {
    pub rx_history: RollingWindow<u64>,
    pub tx_history: RollingWindow<u64>,
}

impl InterfaceState {
    fn seeded(rx: u64, tx: u64) -> Self {
        Self {
            rx_history: RollingWindow::seeded(DEFAULT_WINDOW_SIZE, rx),
            tx_history: RollingWindow::seeded(DEFAULT_WINDOW_SIZE, tx),
        }
    }
}

pub struct NetworkSource {
    config: BarConfig,
    dev_path: PathBuf,
    interfaces: HashMap<String, InterfaceState>,
}

impl NetworkSource {
    pub fn new(config: &BarConfig) -> Self {
        Self {
            config: config.clone(),
            dev_path: config.proc_path("net/dev"),
            interfaces: HashMap::new(),
        }
    }

    /// Render one interface, or `None` when it is not usable right now
    pub fn sample(&mut self, device: &str) -> Option<MetricSample> {
        if carrier_up(&self.config, device) != Some(true) {
            self.forget(device);
            return None;
        }

        let counters = std::fs::read_to_string(&self.dev_path)
            .map_err(StatusError::from)
            .and_then(|s| parse_dev_counters(&s, device));
        match counters {
            Ok((rx, tx)) => Some(self.update(device, rx, tx)),
            Err(e) => {
                log::debug!("net {}: {}", device, e);
                self.forget(device);
                None
            }
        }
    }

    /// Push one counter reading for `device` and render the averaged rate
    pub fn update(&mut self, device: &str, rx: u64, tx: u64) -> MetricSample {
        let state = self
            .interfaces
            .entry(device.to_string())
            .or_insert_with(|| InterfaceState::seeded(rx, tx));
        state.rx_history.push(rx);
        state.tx_history.push(tx);

        let rx_kb = state.rx_history.mean_delta() / 1024;
        let tx_kb = state.tx_history.mean_delta() / 1024;

        let color = if rx_kb < QUIET_KB && tx_kb < QUIET_KB {
            ColorTag::Gray
        } else {
            ColorTag::Default
        };

        MetricSample::new(
            format!("rx: {} tx: {}", format_rate(rx_kb), format_rate(tx_kb)),
            color,
        )
    }

    /// Drop all history for a device
    pub fn forget(&mut self, device: &str) {
        if self.interfaces.remove(device).is_some() {
            log::debug!("net {}: history dropped", device);
        }
    }

    /// Drop history for devices that are no longer present
    pub fn retain_present(&mut self, present: &InterfaceList) {
        self.interfaces.retain(|name, _| present.contains(name));
    }

    pub fn state(&self, device: &str) -> Option<&InterfaceState> {
        self.interfaces.get(device)
    }

    pub fn tracked_count(&self) -> usize {
        self.interfaces.len()
    }
}

fn format_rate(kb: u64) -> String {
    if kb > MB_SWITCH_KB {
        format!("{:>5.1}mb", kb as f64 / 1024.0)
    } else {
        format!("{:>5}kb", kb)
    }
}

/// Cumulative (rx bytes, tx bytes) for `device` from a `/proc/net/dev` dump
pub fn parse_dev_counters(dev: &str, device: &str) -> Result<(u64, u64)> {
    for line in dev.lines() {
        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != device {
            continue;
        }
        let fields: Vec<&str> = counters.split_whitespace().collect();
        if fields.len() < 9 {
            return Err(StatusError::parse(format!("short counter line for {}", device)));
        }
        let parse = |s: &str| {
            s.parse::<u64>()
                .map_err(|e| StatusError::parse(format!("bad counter {:?}: {}", s, e)))
        };
        return Ok((parse(fields[0])?, parse(fields[8])?));
    }
    Err(StatusError::source_unavailable(format!(
        "{} not in /proc/net/dev",
        device
    )))
}
