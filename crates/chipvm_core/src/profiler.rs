use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Collects per-cycle timing while the interpreter runs.
///
/// Tracks how many cycles landed in each wall-clock second of the run and the
/// spread of intervals between consecutive cycles.
pub struct Profiler {
    started: Instant,
    last: Option<Instant>,
    cycles_per_second: BTreeMap<u64, u32>,
    total_cycles: u64,
    min_interval: Option<Duration>,
    max_interval: Duration,
    total_interval: Duration,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            last: None,
            cycles_per_second: BTreeMap::new(),
            total_cycles: 0,
            min_interval: None,
            max_interval: Duration::ZERO,
            total_interval: Duration::ZERO,
        }
    }

    pub fn cycle(&mut self) {
        self.record(Instant::now());
    }

    fn record(&mut self, now: Instant) {
        let second = now.saturating_duration_since(self.started).as_secs();
        *self.cycles_per_second.entry(second).or_default() += 1;
        self.total_cycles += 1;

        if let Some(last) = self.last {
            let interval = now.saturating_duration_since(last);
            self.min_interval = Some(self.min_interval.map_or(interval, |m| m.min(interval)));
            self.max_interval = self.max_interval.max(interval);
            self.total_interval += interval;
        }
        self.last = Some(now);
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Cycle counts keyed by whole seconds since the profiler started.
    pub fn cycles_per_second(&self) -> &BTreeMap<u64, u32> {
        &self.cycles_per_second
    }

    pub fn mean_interval(&self) -> Option<Duration> {
        let intervals = self.total_cycles.checked_sub(1).filter(|n| *n > 0)?;
        Some(self.total_interval / intervals as u32)
    }

    pub fn report(&self) {
        log::info!(
            "CPU frequency: {} cycles, per second {:?}",
            self.total_cycles,
            self.cycles_per_second
        );
        if let (Some(min), Some(mean)) = (self.min_interval, self.mean_interval()) {
            log::info!(
                "CPU timings: min {:?}, mean {:?}, max {:?}",
                min,
                mean,
                self.max_interval
            );
        }
    }
}
