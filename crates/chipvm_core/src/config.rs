use typed_builder::TypedBuilder;

use crate::DEFAULT_FREQUENCY;

/// How the delay and sound timers are clocked.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TimerMode {
    /// Decrement once at the end of every CPU cycle.
    #[default]
    PerCycle,
    /// Decrement 60 times per emulated second regardless of the cycle rate.
    Fixed60Hz,
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct Config {
    /// Target cycles per second.
    #[builder(default = DEFAULT_FREQUENCY)]
    pub frequency: u32,
    #[builder(default)]
    pub timer_mode: TimerMode,
    /// Seed for the RANDOM instruction; entropy when absent.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
    #[builder(default = false)]
    pub start_paused: bool,
    #[builder(default = false)]
    pub profile: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}
