use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use statline::core::{ColorTag, Notification, Scheduler};

use super::fixture::{texts, FakeHost};

#[test]
fn test_block_order_on_a_laptop() {
    let host = FakeHost::new();
    host.add_interface("eth0", false, Some(true));
    host.add_interface("wlan0", true, Some(false));
    host.set_net_counters(&[("eth0", 1000, 2000), ("wlan0", 0, 0)]);
    host.write_supply("BAT0", &[
        ("type", "Battery\n"),
        ("energy_now", "50000\n"),
        ("energy_full", "100000\n"),
        ("status", "Discharging\n"),
    ]);
    host.write_supply("AC", &[("type", "Mains\n"), ("online", "0\n")]);

    let mut status = host.status_line();
    status.power_mut().start(false);
    status
        .notifications_mut()
        .push(Notification::from_request("mail", "New mail", "", 5000));

    let line = status.render();
    let texts = texts(&line.samples);

    assert_eq!(
        &texts[..7],
        &[
            "mail: New mail",
            "bat: 50%",
            "rx:     0kb tx:     0kb",
            "load: 0.50",
            "mem: 25%",
            "cpu:  20%",
            "vol:  40%",
        ]
    );
    // wlan0 is down but eth0 carries traffic: no Wi-Fi alarm
    assert!(!texts.iter().any(|t| t.contains("wifi")));
    // date and time close the line
    assert_eq!(texts.len(), 9);
    assert!(texts[7].starts_with("week "));
    assert_eq!(line.samples[7].color, ColorTag::Gray);
    assert!(line.actions.is_empty());
}

#[test]
fn test_wifi_down_alarm_without_wired_link() {
    let host = FakeHost::new();
    host.add_interface("wlan0", true, Some(false));

    let mut status = host.status_line();
    let line = status.render();
    let wifi = line
        .samples
        .iter()
        .find(|s| s.text == "wifi down")
        .expect("wifi block");
    assert_eq!(wifi.color, ColorTag::Red);
}

#[test]
fn test_no_wifi_flag_hides_block() {
    let host = FakeHost::new();
    host.add_interface("wlan0", true, Some(false));

    let mut config = host.config();
    config.show_wifi = false;
    let mut status = statline::core::StatusLine::with_disks(
        config,
        statline::core::sources::DiskSource::with_mounts(Vec::new()),
        Box::new(super::fixture::FixedAudio::new(10, true)),
    );
    let line = status.render();
    assert!(!texts(&line.samples).iter().any(|t| t.contains("wifi")));
}

#[test]
fn test_broken_sources_render_placeholders() {
    let host = FakeHost::new();
    std::fs::remove_file(host.proc_root().join("meminfo")).unwrap();
    std::fs::remove_file(host.proc_root().join("loadavg")).unwrap();
    std::fs::write(host.proc_root().join("stat"), "garbage\n").unwrap();

    let mut status = host.status_line();
    let texts = texts(&status.render().samples);
    assert!(texts.contains(&"load: error".to_string()));
    assert!(texts.iter().any(|t| t.starts_with("mem: error opening")));
    assert!(texts.contains(&"cpu usage error".to_string()));
}

#[test]
fn test_scheduler_streams_protocol() {
    let host = FakeHost::new();
    let mut config = host.config();
    config.interval = Duration::from_millis(1);

    let stop = Arc::new(AtomicBool::new(false));
    let mut scheduler = Scheduler::new(&config, host.status_line(), Vec::new(), stop);
    scheduler.run_cycle().unwrap();
    scheduler.run_cycle().unwrap();

    let out = String::from_utf8(scheduler.into_output()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(line.starts_with("[{\"full_text\":"));
        assert!(line.ends_with("],"));
        assert!(line.contains("\"full_text\":\"load: 0.50\""));
    }
}
