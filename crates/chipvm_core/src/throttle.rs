use std::thread;
use std::time::{Duration, Instant};

/// Paces a loop to a fixed number of iterations per second.
///
/// Each call sleeps until one period has passed since the previous call. A
/// caller that is already late is not made to catch up: the reference point
/// simply moves to now.
pub struct Throttle {
    period: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(frequency: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / frequency.max(1),
            last: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn throttle(&mut self) {
        let now = Instant::now();
        let Some(last) = self.last else {
            self.last = Some(now);
            return;
        };
        let deadline = last + self.period;
        if deadline > now {
            thread::sleep(deadline - now);
            self.last = Some(deadline);
        } else {
            self.last = Some(now);
        }
    }
}
