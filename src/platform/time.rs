//! Fixed-interval tick driver
//!
//! The host reports elapsed wall time each frame; the driver fires the tick
//! callback once per whole interval, carrying the remainder forward.

use std::time::Duration;

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, TICK_INTERVAL_MS};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct TickDriver {
    interval: Duration,
    accumulator: Duration,
    ticks: u64,
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_INTERVAL_MS))
    }
}

impl TickDriver {
    /// A zero interval is bumped to one millisecond
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.tick_interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Total ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Account for `elapsed` wall time and fire `on_tick` for each whole
    /// interval, at most `MAX_SUBSTEPS` times. Returns the ticks fired.
    pub fn advance<F: FnMut()>(&mut self, elapsed: Duration, mut on_tick: F) -> u32 {
        let elapsed = elapsed.min(Duration::from_millis(MAX_FRAME_MS));
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= self.interval && substeps < MAX_SUBSTEPS {
            on_tick();
            self.accumulator -= self.interval;
            substeps += 1;
        }

        // Drop backlog we refused to run
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.interval {
            log::trace!("Tick driver dropping {:?} of backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }

        self.ticks += u64::from(substeps);
        substeps
    }
}
