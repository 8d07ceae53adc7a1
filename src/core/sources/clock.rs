use chrono::{DateTime, Local, TimeZone};

use crate::core::metrics::MetricSample;

/// Date block (gray) followed by the time of day (default colour)
pub fn clock_samples<Tz: TimeZone>(now: &DateTime<Tz>) -> [MetricSample; 2]
where
    Tz::Offset: std::fmt::Display,
{
    [
        MetricSample::gray(now.format("week %V %a %F").to_string()),
        MetricSample::plain(now.format("%T").to_string()),
    ]
}

pub fn local_clock() -> [MetricSample; 2] {
    clock_samples(&Local::now())
}
