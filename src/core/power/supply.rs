//! Power-supply device discovery and property snapshots.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, StatusError};

/// Names of the battery and charger devices under `class/power_supply`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyDevices {
    pub battery: Option<String>,
    pub charger: Option<String>,
}

impl SupplyDevices {
    /// First `Battery` and first `Mains` device, by name order
    pub fn discover(supply_dir: &Path) -> Self {
        let mut devices = Self::default();
        let mut names: Vec<String> = match std::fs::read_dir(supply_dir) {
            Ok(entries) => entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect(),
            Err(e) => {
                log::debug!("no power supplies at {}: {}", supply_dir.display(), e);
                return devices;
            }
        };
        names.sort();

        for name in names {
            let kind = std::fs::read_to_string(supply_dir.join(&name).join("type"))
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            match kind.as_str() {
                "Battery" if devices.battery.is_none() => devices.battery = Some(name),
                "Mains" if devices.charger.is_none() => devices.charger = Some(name),
                _ => log::debug!("ignoring power supply {} ({})", name, kind),
            }
        }
        devices
    }
}

/// Immutable view of one device's `POWER_SUPPLY_*` properties.
///
/// Built either from a sysfs `uevent` file or from a kernel event; both use
/// the same `KEY=VALUE` format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplySnapshot {
    pub name: String,
    properties: HashMap<String, String>,
}

impl SupplySnapshot {
    pub fn from_properties(name: &str, properties: HashMap<String, String>) -> Self {
        Self {
            name: name.to_string(),
            properties,
        }
    }

    pub fn from_uevent_text(name: &str, text: &str) -> Self {
        let properties = text
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        Self::from_properties(name, properties)
    }

    /// Read `<supply_dir>/<name>/uevent`
    pub fn read(supply_dir: &Path, name: &str) -> Result<Self> {
        let text = std::fs::read_to_string(supply_dir.join(name).join("uevent"))?;
        Ok(Self::from_uevent_text(name, &text))
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// `POWER_SUPPLY_ONLINE` as a flag, `None` when absent or not 0/1
    pub fn online(&self) -> Option<bool> {
        match self.property("POWER_SUPPLY_ONLINE")? {
            "1" => Some(true),
            "0" => Some(false),
            other => {
                log::warn!("unknown charger online value {:?}", other);
                None
            }
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.property("POWER_SUPPLY_STATUS")
    }

    pub fn capacity(&self) -> Option<u8> {
        self.property("POWER_SUPPLY_CAPACITY")?
            .parse::<u8>()
            .ok()
            .map(|c| c.min(100))
    }

    pub fn is_charging(&self) -> Option<bool> {
        self.status().map(|s| s == "Charging")
    }
}

/// Counter files read directly when no event source is usable
pub struct FallbackFiles {
    battery_dir: PathBuf,
    charger_online: Option<PathBuf>,
}

/// What the fallback files said this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackReading {
    pub percentage: u8,
    pub charging: bool,
    pub charger_online: Option<bool>,
}

impl FallbackFiles {
    pub fn new(supply_dir: &Path, devices: &SupplyDevices) -> Self {
        let battery = devices.battery.as_deref().unwrap_or("BAT0");
        Self {
            battery_dir: supply_dir.join(battery),
            charger_online: devices
                .charger
                .as_ref()
                .map(|c| supply_dir.join(c).join("online")),
        }
    }

    pub fn read(&self) -> Result<FallbackReading> {
        let (now, full) = self
            .read_pair("energy_now", "energy_full")
            .or_else(|_| self.read_pair("charge_now", "charge_full"))?;
        if full == 0 {
            return Err(StatusError::parse("battery full capacity is zero"));
        }
        let percentage = ((now as f64 * 100.0 / full as f64).round() as u64).min(100) as u8;

        let status = std::fs::read_to_string(self.battery_dir.join("status"))?;
        let charging = status == "Charging\n" || status == "Charging";

        let charger_online = self
            .charger_online
            .as_ref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .map(|s| s.trim() == "1");

        Ok(FallbackReading {
            percentage,
            charging,
            charger_online,
        })
    }

    fn read_pair(&self, now: &str, full: &str) -> Result<(u64, u64)> {
        Ok((self.read_counter(now)?, self.read_counter(full)?))
    }

    fn read_counter(&self, file: &str) -> Result<u64> {
        let path = self.battery_dir.join(file);
        let text = std::fs::read_to_string(&path)?;
        text.trim()
            .parse::<u64>()
            .map_err(|e| StatusError::parse(format!("{}: {}", path.display(), e)))
    }

    /// `capacity` file of the battery, read every cycle in event mode
    pub fn read_capacity(&self) -> Option<u8> {
        std::fs::read_to_string(self.battery_dir.join("capacity"))
            .ok()?
            .trim()
            .parse::<u8>()
            .ok()
            .map(|c| c.min(100))
    }
}
