//! Countdown clock
//!
//! Tracks elapsed seconds against a fixed start budget. Remaining time is not
//! floored: it runs negative past expiry and expiry is reported as an edge,
//! once per crossing, rather than clamped.

use serde::{Deserialize, Serialize};

use crate::consts::{GRADUAL_RATE, START_SECONDS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownClock {
    elapsed: f32,
    /// Seconds queued by `add_gradually`, drained by `tick`
    pending_gradual: f32,
    /// Set once expiry has been reported, cleared when time is back above zero
    #[serde(default)]
    expiry_signalled: bool,
}

impl CountdownClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to a full clock with nothing pending
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn pending_gradual(&self) -> f32 {
        self.pending_gradual
    }

    /// Add to elapsed time immediately. Negative amounts give time back.
    pub fn add(&mut self, amount: f32) {
        self.elapsed += amount;
    }

    /// Queue time to be added over the following ticks
    pub fn add_gradually(&mut self, amount: f32) {
        self.pending_gradual += amount;
    }

    /// Advance the clock by one frame.
    ///
    /// Returns true on the tick where remaining time first reaches zero or
    /// below. Further ticks while still expired return false.
    pub fn tick(&mut self, dt: f32) -> bool {
        let drain = self.drain_gradual(dt);
        self.elapsed += dt + drain;

        if self.time_left() <= 0 {
            if self.expiry_signalled {
                return false;
            }
            self.expiry_signalled = true;
            log::info!("Clock expired (elapsed {:.2}s)", self.elapsed);
            true
        } else {
            self.expiry_signalled = false;
            false
        }
    }

    /// Portion of the gradual pool released this frame, capped by rate
    fn drain_gradual(&mut self, dt: f32) -> f32 {
        if self.pending_gradual <= 0.0 {
            return 0.0;
        }
        let drain = self.pending_gradual.min(dt * GRADUAL_RATE);
        self.pending_gradual -= drain;
        drain
    }

    /// Whole seconds left, truncated toward zero
    pub fn time_left(&self) -> i32 {
        (START_SECONDS - self.elapsed) as i32
    }

    pub fn is_expired(&self) -> bool {
        self.time_left() <= 0
    }

    /// `"Time Left: M:SS"`. Past expiry the minutes go negative and the
    /// seconds stay in 0..60, e.g. `"Time Left: -1:10"` for -50.
    pub fn clock_display(&self) -> String {
        format_clock(self.time_left())
    }
}

/// Minutes by floor division, seconds as the non-negative remainder.
/// Total over the whole `i32` range.
pub fn format_clock(time_left: i32) -> String {
    let mins = time_left.div_euclid(60);
    let secs = time_left.rem_euclid(60);
    format!("Time Left: {}:{:02}", mins, secs)
}
