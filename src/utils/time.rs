use std::time::Duration;

/// Frame timing accumulated from clock readings.
///
/// The timer does not read a clock itself; the frame loop feeds it the
/// current time from its injected [`Clock`](crate::app::Clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    start_time: Duration,
    last_update: Duration,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since the timer started
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Timer {
    /// Creates a timer whose zero point is the clock reading `now`.
    #[must_use]
    pub fn new(now: Duration) -> Self {
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advances the timer to the clock reading `now`.
    ///
    /// A reading older than the previous one yields a zero delta.
    pub fn tick(&mut self, now: Duration) {
        self.delta = now.saturating_sub(self.last_update);
        self.elapsed = now.saturating_sub(self.start_time);
        self.last_update = now.max(self.last_update);
        self.frame_count += 1;
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
