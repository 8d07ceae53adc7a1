use statline::core::notifications::MAX_NOTIFICATIONS;
use statline::core::{ColorTag, Notification, NotificationQueue};

#[test]
fn test_notification_lifecycle() {
    let mut queue = NotificationQueue::new();
    queue.push(Notification::from_request("irc", "ping from bob", "", 12_000));

    let head = queue.head().unwrap();
    assert_eq!(head.remaining_ticks, 12);
    assert_eq!(head.render().text, "irc: ping from bob");
    assert_eq!(head.render().color, ColorTag::Inverted);

    queue.tick();
    assert_eq!(queue.head().unwrap().render().color, ColorTag::Default);

    for _ in 0..11 {
        queue.tick();
    }
    assert!(queue.is_empty());
}

#[test]
fn test_burst_of_notifications_keeps_newest() {
    let mut queue = NotificationQueue::new();
    for i in 0..8 {
        queue.push(Notification::from_request(
            "build",
            &format!("job {} done", i),
            "",
            10_000,
        ));
    }
    assert_eq!(queue.len(), MAX_NOTIFICATIONS);
    let messages: Vec<&str> = queue.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["job 3 done", "job 4 done", "job 5 done", "job 6 done", "job 7 done"]
    );

    // Everything but the newest goes after one cycle each
    for _ in 0..4 {
        queue.tick();
    }
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.head().unwrap().remaining_ticks, 10);
}

#[test]
fn test_markup_is_stripped() {
    let n = Notification::from_request("app<b>", "<i>Hello</i> $world!", "", 0);
    assert_eq!(n.app, "appb");
    assert_eq!(n.message, "iHelloi world");
}
