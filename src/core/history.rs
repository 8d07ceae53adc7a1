use std::collections::VecDeque;

/// Default number of retained samples (the incoming slot comes on top)
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Fixed-length rolling window: `capacity` past samples plus the incoming one.
///
/// The window is always full. It is seeded with a single value repeated
/// across every slot, so the first deltas computed from it are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingWindow<T> {
    capacity: usize,
    values: VecDeque<T>,
}

impl<T: Copy> RollingWindow<T> {
    /// Create a window whose `capacity + 1` slots all hold `seed`
    pub fn seeded(capacity: usize, seed: T) -> Self {
        let mut values = VecDeque::with_capacity(capacity + 1);
        values.extend(std::iter::repeat(seed).take(capacity + 1));
        Self { capacity, values }
    }

    /// Push the incoming sample, evicting the oldest
    pub fn push(&mut self, value: T) {
        self.values.pop_front();
        self.values.push_back(value);
    }

    /// Number of past samples retained (excluding the incoming slot)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Logical slot count, always `capacity + 1`
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn oldest(&self) -> T {
        self.values[0]
    }

    pub fn newest(&self) -> T {
        self.values[self.values.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl RollingWindow<u64> {
    /// Mean over every slot, incoming sample included
    pub fn mean(&self) -> u64 {
        let sum: u128 = self.values.iter().map(|&v| v as u128).sum();
        (sum / self.values.len() as u128) as u64
    }

    /// Mean per-sample increase across the window.
    ///
    /// Counters that went backwards (driver reset) count as no increase.
    pub fn mean_delta(&self) -> u64 {
        self.newest().saturating_sub(self.oldest()) / self.capacity.max(1) as u64
    }
}

/// Counts consecutive "high" samples; any low sample resets it to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HysteresisCounter {
    count: u32,
}

impl HysteresisCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, high: bool) {
        if high {
            self.count = self.count.saturating_add(1);
        } else {
            self.count = 0;
        }
    }

    pub fn value(&self) -> u32 {
        self.count
    }
}
