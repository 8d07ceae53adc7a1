//! Battery and charger state machine.
//!
//! Readings come from kernel power-supply events when that source works and
//! from the battery's counter files otherwise. Every reading then goes
//! through the same rendering ladder, which also emits the edge-triggered
//! side effects (suspend, low-battery warning) as [`PowerAction`] values for
//! the caller to carry out.

mod supply;

pub use supply::{FallbackFiles, FallbackReading, SupplyDevices, SupplySnapshot};

use std::path::PathBuf;

use crate::core::config::BarConfig;
use crate::core::metrics::{ColorTag, MetricSample};
use crate::platform::DeviceEvent;

/// Charger online and above this percentage: nothing worth showing
const FULL_SUPPRESS_ABOVE: u8 = 97;
const SUSPEND_BELOW: u8 = 5;
const CRITICAL_BELOW: u8 = 10;
const LOW_BELOW: u8 = 30;
const HIGH_ABOVE: u8 = 90;
/// Cycles the critical indicator blinks after first dropping below 10%
const FLASH_CYCLES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    Uninitialized,
    EventDriven,
    PollingFallback,
}

/// Last known power situation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerState {
    pub charger_online: bool,
    pub battery_charging: bool,
    pub percentage: u8,
    /// Previous cycle's percentage, `None` before the first reading
    pub last_percentage: Option<u8>,
    /// Both devices parsed from the event source
    pub valid: bool,
}

impl Default for PowerState {
    fn default() -> Self {
        Self {
            charger_online: false,
            battery_charging: false,
            percentage: 100,
            last_percentage: None,
            valid: false,
        }
    }
}

/// One cycle's worth of input to the rendering ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerReading {
    pub charger_online: bool,
    pub battery_charging: bool,
    pub percentage: u8,
}

/// Side effects requested by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Suspend,
    LowBatteryWarning(u8),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerOutcome {
    /// `None` when the block is intentionally omitted (full on charger)
    pub sample: Option<MetricSample>,
    pub actions: Vec<PowerAction>,
}

pub struct PowerMonitor {
    supply_dir: PathBuf,
    devices: SupplyDevices,
    fallback: FallbackFiles,
    battery_snapshot: Option<SupplySnapshot>,
    charger_snapshot: Option<SupplySnapshot>,
    mode: PowerMode,
    state: PowerState,
    flash_ticks: u32,
    low_warned: bool,
}

impl PowerMonitor {
    pub fn new(config: &BarConfig) -> Self {
        let supply_dir = config.power_supply_dir();
        let devices = SupplyDevices::discover(&supply_dir);
        Self::with_devices(supply_dir, devices)
    }

    pub fn with_devices(supply_dir: PathBuf, devices: SupplyDevices) -> Self {
        let fallback = FallbackFiles::new(&supply_dir, &devices);
        Self {
            supply_dir,
            devices,
            fallback,
            battery_snapshot: None,
            charger_snapshot: None,
            mode: PowerMode::Uninitialized,
            state: PowerState::default(),
            flash_ticks: 0,
            low_warned: false,
        }
    }

    pub fn has_battery(&self) -> bool {
        self.devices.battery.is_some()
    }

    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    pub fn state(&self) -> &PowerState {
        &self.state
    }

    /// Leave `Uninitialized`: probe the devices when an event source is
    /// available, otherwise go straight to polling.
    pub fn start(&mut self, event_source_available: bool) {
        if !event_source_available {
            log::warn!("no device event source, polling battery files");
            self.mode = PowerMode::PollingFallback;
            return;
        }
        self.resync();
    }

    /// Re-read both devices from sysfs, e.g. after the event source dropped
    /// events
    pub fn resync(&mut self) {
        self.battery_snapshot = self.read_snapshot(self.devices.battery.clone());
        self.charger_snapshot = self.read_snapshot(self.devices.charger.clone());
        self.revalidate();
    }

    /// The device event source failed after start: keep going on the files
    pub fn event_source_lost(&mut self) {
        self.state.valid = false;
        if self.mode != PowerMode::PollingFallback {
            log::warn!("device event source lost, polling battery files");
        }
        self.mode = PowerMode::PollingFallback;
    }

    /// Fold one device event into the state.
    ///
    /// The event's property map replaces the snapshot of the device it names;
    /// the other device is re-read so both are current.
    pub fn handle_event(&mut self, event: DeviceEvent) {
        let name = event.sysname().to_string();
        let snapshot = SupplySnapshot::from_properties(&name, event.properties);

        if self.devices.battery.as_deref() == Some(name.as_str()) {
            self.battery_snapshot = Some(snapshot);
            self.charger_snapshot = self.read_snapshot(self.devices.charger.clone());
        } else if self.devices.charger.as_deref() == Some(name.as_str()) {
            self.charger_snapshot = Some(snapshot);
            self.battery_snapshot = self.read_snapshot(self.devices.battery.clone());
        } else {
            log::debug!("ignoring event for power supply {}", name);
            return;
        }
        self.revalidate();
    }

    fn read_snapshot(&self, name: Option<String>) -> Option<SupplySnapshot> {
        let name = name?;
        match SupplySnapshot::read(&self.supply_dir, &name) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::debug!("power supply {}: {}", name, e);
                None
            }
        }
    }

    fn revalidate(&mut self) {
        let charger_online = self.charger_snapshot.as_ref().and_then(|s| s.online());
        let battery = self.battery_snapshot.as_ref().and_then(|s| {
            let charging = s.is_charging()?;
            Some((charging, s.capacity()))
        });

        match (charger_online, battery) {
            (Some(online), Some((charging, capacity))) => {
                self.state.valid = true;
                self.state.charger_online = online;
                self.state.battery_charging = charging;
                if let Some(capacity) = capacity {
                    self.state.percentage = capacity;
                }
                if self.mode != PowerMode::EventDriven {
                    log::info!("power state event driven");
                }
                self.mode = PowerMode::EventDriven;
            }
            _ => {
                self.state.valid = false;
                self.state.charger_online = false;
                if self.mode != PowerMode::PollingFallback {
                    log::warn!("inconsistent power supply reading, polling battery files");
                }
                self.mode = PowerMode::PollingFallback;
            }
        }
    }

    /// Produce this cycle's battery block and side effects
    pub fn sample(&mut self) -> PowerOutcome {
        let event_reading = match self.mode {
            PowerMode::EventDriven if self.state.valid => {
                self.event_percentage().map(|percentage| PowerReading {
                    charger_online: self.state.charger_online,
                    battery_charging: self.state.battery_charging,
                    percentage,
                })
            }
            _ => None,
        };

        let reading = match event_reading {
            Some(reading) => Some(reading),
            None => match self.fallback.read() {
                Ok(r) => Some(PowerReading {
                    charger_online: r.charger_online.unwrap_or(r.charging),
                    battery_charging: r.charging,
                    percentage: r.percentage,
                }),
                Err(e) => {
                    log::warn!("battery: {}", e);
                    None
                }
            },
        };

        match reading {
            Some(reading) => self.apply(reading),
            None => PowerOutcome {
                sample: Some(MetricSample::red("bat: error")),
                actions: Vec::new(),
            },
        }
    }

    /// Charge level in event mode: the `capacity` file, else the last
    /// event's property. `None` sends the cycle to the counter files.
    fn event_percentage(&self) -> Option<u8> {
        self.fallback.read_capacity().or_else(|| {
            self.battery_snapshot
                .as_ref()
                .and_then(SupplySnapshot::capacity)
        })
    }

    /// The rendering ladder and edge detection, independent of where the
    /// reading came from
    pub fn apply(&mut self, reading: PowerReading) -> PowerOutcome {
        let pct = reading.percentage;
        let previous = self.state.last_percentage;
        self.state.charger_online = reading.charger_online;
        self.state.battery_charging = reading.battery_charging;
        self.state.percentage = pct;
        self.state.last_percentage = Some(pct);

        let mut actions = Vec::new();
        let charging = reading.charger_online && reading.battery_charging;

        if !charging {
            if let Some(prev) = previous {
                if prev >= SUSPEND_BELOW && pct < prev && pct < SUSPEND_BELOW {
                    log::warn!("battery at {}%, requesting suspend", pct);
                    actions.push(PowerAction::Suspend);
                }
            }
        }

        if reading.charger_online && pct > FULL_SUPPRESS_ABOVE {
            self.reset_low_battery();
            return PowerOutcome {
                sample: None,
                actions,
            };
        }

        if charging {
            self.reset_low_battery();
            return PowerOutcome {
                sample: Some(MetricSample::gray(format!("charging: {}%", pct))),
                actions,
            };
        }

        if pct < CRITICAL_BELOW {
            if !self.low_warned {
                self.low_warned = true;
                self.flash_ticks = FLASH_CYCLES;
                actions.push(PowerAction::LowBatteryWarning(pct));
            }
        } else {
            self.reset_low_battery();
        }

        let color = if pct < CRITICAL_BELOW {
            self.critical_color()
        } else if pct < LOW_BELOW {
            ColorTag::Green
        } else if pct > HIGH_ABOVE {
            ColorTag::Gray
        } else {
            ColorTag::Default
        };

        PowerOutcome {
            sample: Some(MetricSample::new(format!("bat: {}%", pct), color)),
            actions,
        }
    }

    fn critical_color(&mut self) -> ColorTag {
        if self.flash_ticks == 0 {
            return ColorTag::Red;
        }
        self.flash_ticks -= 1;
        if self.flash_ticks % 2 == 0 {
            ColorTag::RedBackground
        } else {
            ColorTag::Red
        }
    }

    fn reset_low_battery(&mut self) {
        self.low_warned = false;
        self.flash_ticks = 0;
    }
}
