use statline::core::sources::{InterfaceList, NetworkSource};
use statline::core::ColorTag;

use super::fixture::FakeHost;

#[test]
fn test_rate_is_averaged_over_window() {
    let host = FakeHost::new();
    host.add_interface("eth0", false, Some(true));
    let mut net = NetworkSource::new(&host.config());

    host.set_net_counters(&[("eth0", 0, 0)]);
    assert!(net.sample("eth0").is_some());

    // 5 MiB down in one step, averaged over five slots
    host.set_net_counters(&[("eth0", 5 * 1024 * 1024, 0)]);
    let sample = net.sample("eth0").unwrap();
    assert_eq!(sample.text, "rx:   1.0mb tx:     0kb");
    assert_eq!(sample.color, ColorTag::Default);
}

#[test]
fn test_carrier_loss_purges_and_reconnect_rebaselines() {
    let host = FakeHost::new();
    host.add_interface("eth0", false, Some(true));
    let mut net = NetworkSource::new(&host.config());

    host.set_net_counters(&[("eth0", 1_000_000, 1_000_000)]);
    net.sample("eth0");
    assert_eq!(net.tracked_count(), 1);

    host.set_carrier("eth0", Some(false));
    assert!(net.sample("eth0").is_none());
    assert!(net.state("eth0").is_none());

    // Counter jumped while the link was down; no spike after reconnect
    host.set_carrier("eth0", Some(true));
    host.set_net_counters(&[("eth0", 900_000_000, 900_000_000)]);
    let sample = net.sample("eth0").unwrap();
    assert_eq!(sample.text, "rx:     0kb tx:     0kb");
    assert_eq!(sample.color, ColorTag::Gray);
}

#[test]
fn test_vanished_interface_is_dropped() {
    let host = FakeHost::new();
    host.add_interface("tun0", false, Some(true));
    host.add_interface("eth0", false, Some(true));
    host.set_net_counters(&[("tun0", 10, 10), ("eth0", 10, 10)]);
    let config = host.config();
    let mut net = NetworkSource::new(&config);

    net.sample("tun0");
    net.sample("eth0");
    assert_eq!(net.tracked_count(), 2);

    host.remove_interface("tun0");
    let present = InterfaceList::scan(&config);
    assert_eq!(present.ethernet, vec!["eth0".to_string()]);
    net.retain_present(&present);
    assert_eq!(net.tracked_count(), 1);
    assert!(net.state("eth0").is_some());
}

#[test]
fn test_scan_classifies_interfaces() {
    let host = FakeHost::new();
    host.add_interface("wlp3s0", true, Some(true));
    host.add_interface("enp0s25", false, Some(false));

    let list = InterfaceList::scan(&host.config());
    assert_eq!(list.ethernet, vec!["enp0s25".to_string()]);
    assert_eq!(list.wireless, vec!["wlp3s0".to_string()]);
    assert!(!list.contains("lo"));
}
