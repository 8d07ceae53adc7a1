//! Desktop notifications shown at the head of the bar.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use super::metrics::{ColorTag, MetricSample};

pub const MAX_NOTIFICATIONS: usize = 5;
/// Shortest display time, in cycles
const MIN_TIMEOUT_MS: i32 = 10_000;
const MAX_TEXT_CHARS: usize = 50;

static STRIP_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.,#_\- ]").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub app: String,
    pub message: String,
    pub remaining_ticks: u32,
}

impl Notification {
    /// Build from a raw `Notify` call. App and summary are reduced to a safe
    /// character set; an empty summary falls back to the body.
    pub fn from_request(app: &str, summary: &str, body: &str, timeout_ms: i32) -> Self {
        let app = STRIP_UNSAFE.replace_all(app, "").to_string();
        let mut message = STRIP_UNSAFE.replace_all(summary, "").to_string();
        if message.is_empty() {
            message = body.to_string();
        }
        Self {
            app,
            message,
            remaining_ticks: (timeout_ms.max(MIN_TIMEOUT_MS) / 1000) as u32,
        }
    }

    pub fn render(&self) -> MetricSample {
        let mut text = String::new();
        if !self.app.is_empty() {
            text.push_str(&self.app);
            text.push_str(": ");
        }
        text.push_str(&self.message);
        if text.chars().count() > MAX_TEXT_CHARS {
            text = text.chars().take(MAX_TEXT_CHARS).collect();
            text.push_str("...");
        }

        let color = if self.remaining_ticks % 2 == 0 {
            ColorTag::Inverted
        } else {
            ColorTag::Default
        };
        MetricSample::new(text, color)
    }
}

/// Bounded FIFO of pending notifications; only the head is shown and aged
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification. Whatever is already waiting is cut down to one
    /// more cycle, and the oldest entry is dropped when full.
    pub fn push(&mut self, notification: Notification) {
        for pending in self.items.iter_mut() {
            pending.remaining_ticks = pending.remaining_ticks.min(1);
        }
        while self.items.len() >= MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        self.items.push_back(notification);
    }

    /// One cycle passed: age the head, evicting it when it runs out
    pub fn tick(&mut self) {
        let Some(head) = self.items.front_mut() else {
            return;
        };
        head.remaining_ticks = head.remaining_ticks.saturating_sub(1);
        if head.remaining_ticks == 0 {
            self.items.pop_front();
        }
    }

    pub fn head(&self) -> Option<&Notification> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }
}
