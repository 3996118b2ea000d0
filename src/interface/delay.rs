//! Delays
//!
//! Blocking millisecond delays used for boot, power-up and reset waits.

use std::{thread, time::Duration};

/// Millisecond delay
pub trait DelayMs {
    /// Pauses execution for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Delay backed by `thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct TimerMs {}

impl DelayMs for TimerMs {
    fn delay_ms(&mut self, ms: u32) {
        delay_ms(ms);
    }
}

/// Sleep the current thread for `ms` milliseconds
pub fn delay_ms(ms: u32) {
    thread::sleep(Duration::from_millis(ms.into()));
}

/// Records requested delays without sleeping
#[derive(Debug, Default, Clone)]
pub struct NoDelay {
    pub requested: Vec<u32>,
}

impl NoDelay {
    /// Total milliseconds that would have been slept
    pub fn total_ms(&self) -> u32 {
        self.requested.iter().sum()
    }
}

impl DelayMs for NoDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.requested.push(ms);
    }
}
