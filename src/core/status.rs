//! Assembles one status line from every source, in a fixed order.

use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::config::BarConfig;
use super::metrics::MetricSample;
use super::notifications::{Notification, NotificationQueue};
use super::power::{PowerAction, PowerMonitor};
use super::sources::{
    local_clock, AudioServer, CpuSource, DiskSource, InterfaceList, LoadSource, MemorySource,
    NetworkSource, VolumeSource, WifiSource,
};

/// How long the low-battery notification stays up, in milliseconds
const LOW_BATTERY_TIMEOUT_MS: i32 = 30_000;

/// Output of one render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedLine {
    pub samples: Vec<MetricSample>,
    /// Side effects the loop still has to carry out
    pub actions: Vec<PowerAction>,
}

/// Every metric source, each constructed once and kept for the process
/// lifetime
pub struct StatusLine {
    config: BarConfig,
    notifications: NotificationQueue,
    power: PowerMonitor,
    disks: DiskSource,
    network: NetworkSource,
    wifi: WifiSource,
    load: LoadSource,
    memory: MemorySource,
    cpu: CpuSource,
    volume: VolumeSource,
}

impl StatusLine {
    pub fn new(config: BarConfig, audio: Box<dyn AudioServer>) -> Self {
        Self::with_disks(config.clone(), DiskSource::new(&config), audio)
    }

    /// Like [`StatusLine::new`] with an explicit disk source
    pub fn with_disks(config: BarConfig, disks: DiskSource, audio: Box<dyn AudioServer>) -> Self {
        Self {
            notifications: NotificationQueue::new(),
            power: PowerMonitor::new(&config),
            disks,
            network: NetworkSource::new(&config),
            wifi: WifiSource::new(&config),
            load: LoadSource::new(config.proc_path("loadavg")),
            memory: MemorySource::new(config.proc_path("meminfo")),
            cpu: CpuSource::new(config.proc_path("stat"), logical_cores()),
            volume: VolumeSource::new(audio),
            config,
        }
    }

    pub fn power_mut(&mut self) -> &mut PowerMonitor {
        &mut self.power
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    /// Sample every source once
    pub fn render(&mut self) -> RenderedLine {
        let mut samples = Vec::new();
        let mut actions = Vec::new();

        if let Some(head) = self.notifications.head() {
            samples.push(head.render());
        }

        if self.power.has_battery() {
            let outcome = self.power.sample();
            samples.extend(outcome.sample);
            actions.extend(outcome.actions);
        }

        samples.extend(self.disks.sample_all());

        let interfaces = InterfaceList::scan(&self.config);
        self.network.retain_present(&interfaces);

        let mut wired_active = false;
        for dev in &interfaces.ethernet {
            if let Some(sample) = self.network.sample(dev) {
                wired_active = true;
                samples.push(sample);
            }
        }
        for dev in &interfaces.wireless {
            samples.extend(self.network.sample(dev));
        }
        if self.config.show_wifi {
            for dev in &interfaces.wireless {
                samples.extend(self.wifi.sample(dev, wired_active));
            }
        }

        samples.push(self.load.sample(self.cpu.sustained_high()));
        samples.push(self.memory.sample());
        samples.push(self.cpu.sample());
        samples.push(self.volume.sample());
        samples.extend(local_clock());

        for action in &actions {
            if let PowerAction::LowBatteryWarning(pct) = action {
                self.notifications.push(Notification::from_request(
                    "battery",
                    &format!("Battery low, {} percent left", pct),
                    "",
                    LOW_BATTERY_TIMEOUT_MS,
                ));
            }
        }

        RenderedLine { samples, actions }
    }
}

fn logical_cores() -> usize {
    let system =
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
    system.cpus().len().max(1)
}
