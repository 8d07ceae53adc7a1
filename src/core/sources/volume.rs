//! Default-sink volume.

use crate::core::metrics::{ColorTag, MetricSample};
use crate::error::Result;

/// An audio output device as reported by the sound server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sink {
    pub name: String,
    pub volume_percent: u32,
    pub muted: bool,
}

/// The sound server's view of outputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkList {
    pub sinks: Vec<Sink>,
    pub default_sink: Option<String>,
}

impl SinkList {
    pub fn default_sink(&self) -> Option<&Sink> {
        let name = self.default_sink.as_deref()?;
        self.sinks.iter().find(|s| s.name == name)
    }
}

/// Query interface to the sound server
pub trait AudioServer {
    fn sinks(&mut self) -> Result<SinkList>;
}

pub struct VolumeSource {
    server: Box<dyn AudioServer>,
}

impl VolumeSource {
    pub fn new(server: Box<dyn AudioServer>) -> Self {
        Self { server }
    }

    pub fn sample(&mut self) -> MetricSample {
        let list = match self.server.sinks() {
            Ok(list) => list,
            Err(e) => {
                log::warn!("volume: {}", e);
                SinkList::default()
            }
        };

        match list.default_sink() {
            Some(sink) => volume_sample(sink),
            None => MetricSample::red("couldn't find default sink"),
        }
    }
}

pub fn volume_sample(sink: &Sink) -> MetricSample {
    let color = if sink.muted {
        ColorTag::Gray
    } else {
        ColorTag::Green
    };
    MetricSample::new(format!("vol: {:>3}%", sink.volume_percent), color)
}
