//! Metric sources.
//!
//! Each source owns whatever state it needs between cycles (baselines,
//! rolling windows, counters) and turns one reading into a [`MetricSample`].
//! A failed read never propagates: it becomes placeholder text for that
//! block only.
//!
//! [`MetricSample`]: crate::core::metrics::MetricSample

pub mod clock;
pub mod cpu;
pub mod disk;
pub mod load;
pub mod memory;
pub mod network;
pub mod volume;
pub mod wifi;

pub use clock::{clock_samples, local_clock};
pub use cpu::{CpuSource, CpuTimes};
pub use disk::DiskSource;
pub use load::LoadSource;
pub use memory::{MemInfo, MemorySource};
pub use network::{InterfaceList, InterfaceState, NetworkSource};
pub use volume::{AudioServer, Sink, SinkList, VolumeSource};
pub use wifi::WifiSource;
