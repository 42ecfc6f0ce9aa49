use std::time::Duration;

/// pause after every instruction, to bound execution rate
pub const DEFAULT_STEP_DELAY_US: u64 = 2;

/// display refresh period; ~60Hz
pub const DEFAULT_TICK_MS: u64 = 16;

/// ASCII 'q'
pub const QUIT_KEY: u8 = 113;

/// runtime knobs for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub step_delay: Duration,
    pub tick_period: Duration,
    pub quit_key: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            step_delay: Duration::from_micros(DEFAULT_STEP_DELAY_US),
            tick_period: Duration::from_millis(DEFAULT_TICK_MS),
            quit_key: QUIT_KEY,
        }
    }
}
