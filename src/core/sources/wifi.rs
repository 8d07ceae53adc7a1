//! Wi-Fi link quality from `/proc/net/wireless`.

use std::path::PathBuf;

use super::network::carrier_up;
use crate::core::config::BarConfig;
use crate::core::metrics::{ColorTag, MetricSample};

/// Typical maximum raw link quality reported by drivers
const MAX_QUALITY: i64 = 70;
/// Raw quality above this is considered healthy and dimmed
const GOOD_QUALITY: i64 = 30;

pub struct WifiSource {
    config: BarConfig,
    wireless_path: PathBuf,
}

impl WifiSource {
    pub fn new(config: &BarConfig) -> Self {
        Self {
            config: config.clone(),
            wireless_path: config.proc_path("net/wireless"),
        }
    }

    /// Render the signal block for `device`.
    ///
    /// With `wired_active` set a dead Wi-Fi link is not worth an alarm and
    /// the block is omitted.
    pub fn sample(&self, device: &str, wired_active: bool) -> Option<MetricSample> {
        match carrier_up(&self.config, device) {
            None => {
                return Some(MetricSample::plain(
                    "Unable to get carrier status for wifi",
                ))
            }
            Some(false) => return down(wired_active),
            Some(true) => {}
        }

        let table = match std::fs::read_to_string(&self.wireless_path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("wifi: {}: {}", self.wireless_path.display(), e);
                return Some(MetricSample::plain(format!(
                    "wifi: error opening {}",
                    self.wireless_path.display()
                )));
            }
        };

        match parse_link_quality(&table, device) {
            Some(quality) => Some(quality_sample(quality)),
            // Link up but not associated: always worth an alarm
            None => Some(MetricSample::red("wifi down")),
        }
    }
}

fn down(wired_active: bool) -> Option<MetricSample> {
    if wired_active {
        None
    } else {
        Some(MetricSample::red("wifi down"))
    }
}

pub fn quality_sample(quality: i64) -> MetricSample {
    let color = if quality > GOOD_QUALITY {
        ColorTag::Gray
    } else {
        ColorTag::Default
    };
    MetricSample::new(format!("wifi: {:>3}%", quality * 100 / MAX_QUALITY), color)
}

/// Raw link quality of `device`, e.g. `54` from `wlan0: 0000   54.  -56.  -256 ...`
pub fn parse_link_quality(table: &str, device: &str) -> Option<i64> {
    table.lines().find_map(|line| {
        let (name, rest) = line.split_once(':')?;
        if name.trim() != device {
            return None;
        }
        let quality = rest.split_whitespace().nth(1)?;
        quality.trim_end_matches('.').parse::<i64>().ok()
    })
}
