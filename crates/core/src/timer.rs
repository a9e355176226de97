//! Row timer module - the restartable spawn clock
//!
//! The timer reports a tick value that drives a 4-position indicator; the
//! value runs 1, 2, 3, 4, 0, ... and "full" (value 4) is the owner's signal
//! to spawn a row or end the game. The timer itself owns no thread: the
//! owner schedules a tick event per interval and feeds deliveries back in,
//! with an epoch guard so ticks from a cancelled run are ignored.
//!
//! The interval is re-derived at the start of every level:
//! `base * 0.9^(level - cutoff)` below the skill cutoff, `base` at and past
//! it. Lower levels therefore run slower and the pace bottoms out at the
//! cutoff (level 4 for expert, level 8 for basic). Training mode pins the
//! interval to `base`.

use token_trap_types::{
    Settings, BASE_ROW_INTERVAL_MS, ROW_INTERVAL_DECAY, TIMER_INDICATOR_COUNT,
};

/// Row spawn interval in milliseconds for a level
pub fn row_interval_ms(level: u32, settings: &Settings) -> u64 {
    let cutoff = settings.skill_level.speed_cutoff();
    if settings.is_training_mode || level > cutoff {
        return BASE_ROW_INTERVAL_MS;
    }
    let exponent = level as i32 - cutoff as i32;
    (BASE_ROW_INTERVAL_MS as f64 * ROW_INTERVAL_DECAY.powi(exponent)).round() as u64
}

/// Result of advancing the timer by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowTimerTick {
    pub value: u8,
    pub is_full: bool,
}

/// Restartable periodic clock for row spawning
#[derive(Debug, Clone)]
pub struct RowTimer {
    value: u8,
    interval_ms: u64,
    epoch: u64,
    running: bool,
}

impl RowTimer {
    pub fn new() -> Self {
        Self {
            value: 0,
            interval_ms: BASE_ROW_INTERVAL_MS,
            epoch: 0,
            running: false,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Reset the counter and begin a new run; returns the new epoch
    pub fn start(&mut self) -> u64 {
        self.value = 0;
        self.running = true;
        self.epoch += 1;
        self.epoch
    }

    /// Stop ticking; in-flight tick events become stale
    pub fn cancel(&mut self) {
        self.running = false;
        self.epoch += 1;
    }

    /// Begin a new run with the last-configured interval, keeping the counter
    pub fn resume(&mut self) -> u64 {
        self.running = true;
        self.epoch += 1;
        self.epoch
    }

    /// Whether a delivered tick from the given epoch is still current
    pub fn accepts(&self, epoch: u64) -> bool {
        self.running && epoch == self.epoch
    }

    /// Zero the indicator without touching the run state
    pub fn reset_value(&mut self) {
        self.value = 0;
    }

    /// Advance the counter; wraps to 0 after reaching the indicator count
    pub fn tick(&mut self) -> RowTimerTick {
        self.value = if self.value == TIMER_INDICATOR_COUNT {
            0
        } else {
            self.value + 1
        };
        RowTimerTick {
            value: self.value,
            is_full: self.value == TIMER_INDICATOR_COUNT,
        }
    }
}

impl Default for RowTimer {
    fn default() -> Self {
        Self::new()
    }
}
