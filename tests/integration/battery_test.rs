use statline::core::power::{PowerAction, PowerMode};
use statline::core::{ColorTag, MetricSample, PowerMonitor};

use super::fixture::FakeHost;

fn laptop(host: &FakeHost, energy_now: u64, status: &str, online: &str) {
    host.write_supply("BAT0", &[
        ("type", "Battery\n"),
        ("energy_now", &format!("{}\n", energy_now)),
        ("energy_full", "100000\n"),
        ("status", &format!("{}\n", status)),
    ]);
    host.write_supply("AC", &[("type", "Mains\n"), ("online", &format!("{}\n", online))]);
}

#[test]
fn test_polling_fallback_reads_energy_files() {
    let host = FakeHost::new();
    laptop(&host, 75_000, "Discharging", "0");

    let mut power = PowerMonitor::new(&host.config());
    assert!(power.has_battery());
    power.start(false);
    assert_eq!(power.mode(), PowerMode::PollingFallback);

    let outcome = power.sample();
    assert_eq!(outcome.sample, Some(MetricSample::plain("bat: 75%")));
}

#[test]
fn test_charge_counters_when_energy_missing() {
    let host = FakeHost::new();
    host.write_supply("BAT1", &[
        ("type", "Battery\n"),
        ("charge_now", "2000\n"),
        ("charge_full", "4000\n"),
        ("status", "Charging\n"),
    ]);
    host.write_supply("ADP1", &[("type", "Mains\n"), ("online", "1\n")]);

    let mut power = PowerMonitor::new(&host.config());
    power.start(false);
    assert_eq!(
        power.sample().sample,
        Some(MetricSample::gray("charging: 50%"))
    );
}

#[test]
fn test_event_mode_from_uevent_files() {
    let host = FakeHost::new();
    laptop(&host, 20_000, "Discharging", "0");
    host.write_supply("BAT0", &[
        ("uevent", "POWER_SUPPLY_NAME=BAT0\nPOWER_SUPPLY_STATUS=Discharging\nPOWER_SUPPLY_CAPACITY=20\n"),
        ("capacity", "20\n"),
    ]);
    host.write_supply("AC", &[("uevent", "POWER_SUPPLY_NAME=AC\nPOWER_SUPPLY_ONLINE=0\n")]);

    let mut power = PowerMonitor::new(&host.config());
    power.start(true);
    assert_eq!(power.mode(), PowerMode::EventDriven);
    assert!(power.state().valid);

    let outcome = power.sample();
    assert_eq!(
        outcome.sample,
        Some(MetricSample::new("bat: 20%", ColorTag::Green))
    );
}

#[test]
fn test_full_on_charger_is_hidden() {
    let host = FakeHost::new();
    laptop(&host, 99_000, "Full", "1");

    let mut power = PowerMonitor::new(&host.config());
    power.start(false);
    assert_eq!(power.sample().sample, None);
}

#[test]
fn test_draining_battery_warns_then_suspends() {
    let host = FakeHost::new();
    laptop(&host, 11_000, "Discharging", "0");
    let mut power = PowerMonitor::new(&host.config());
    power.start(false);

    let mut actions = Vec::new();
    for energy in [11_000, 9_000, 6_000, 4_000, 3_000] {
        laptop(&host, energy, "Discharging", "0");
        actions.extend(power.sample().actions);
    }
    assert_eq!(
        actions,
        vec![PowerAction::LowBatteryWarning(9), PowerAction::Suspend]
    );
}

#[test]
fn test_status_line_queues_low_battery_notification() {
    let host = FakeHost::new();
    laptop(&host, 8_000, "Discharging", "0");

    let mut status = host.status_line();
    status.power_mut().start(false);
    let line = status.render();

    assert_eq!(line.actions, vec![PowerAction::LowBatteryWarning(8)]);
    let head = status.notifications().head().unwrap();
    assert_eq!(head.app, "battery");

    // Shown at the head of the next line
    let next = status.render();
    assert!(next.samples[0].text.starts_with("battery: Battery low"));
}
