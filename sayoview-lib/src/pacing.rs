//! Consumer-side rate limiting and FPS measurement.

use crate::constants::DEFAULT_POLL_HZ;
use std::thread;
use std::time::{Duration, Instant};

/// Fixed-interval pacing for the consumer loop.
///
/// A limit of 0 maps to the device-appropriate default poll rate instead of
/// an unbounded loop, so an "uncapped" viewer cannot saturate the transport.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub fn new(fps_limit: u32) -> Self {
        let hz = if fps_limit == 0 { DEFAULT_POLL_HZ } else { fps_limit };
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(hz)),
        }
    }

    /// Time budget of one consumer iteration.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep out one iteration's budget.
    pub fn pause(&self) {
        thread::sleep(self.interval);
    }
}

/// Rolling 1-second window counting consumer iterations.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    ticks: u32,
    current: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            ticks: 0,
            current: 0,
        }
    }

    /// Record one iteration. Returns the closed window's count whenever a
    /// full second has elapsed.
    pub fn tick(&mut self) -> Option<u32> {
        self.record(Instant::now())
    }

    fn record(&mut self, now: Instant) -> Option<u32> {
        self.ticks += 1;
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.current = self.ticks;
            self.ticks = 0;
            self.window_start = now;
            return Some(self.current);
        }
        None
    }

    /// Most recently completed window's count.
    pub fn current(&self) -> u32 {
        self.current
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
