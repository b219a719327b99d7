//! Time sources for the frame loop.
//!
//! [`FrameLoop`](crate::app::FrameLoop) never touches the system clock
//! directly; it reads time and sleeps through a [`Clock`]. Applications use
//! [`SystemClock`], tests drive a [`ManualClock`] by hand.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Monotonic time source with the ability to wait.
pub trait Clock {
    /// Time since this clock's epoch. Never decreases.
    fn now(&self) -> Duration;

    /// Blocks for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    // The browser main thread cannot block; pacing belongs to the host there.
    #[cfg(target_arch = "wasm32")]
    fn sleep(&mut self, duration: Duration) {
        log::trace!("SystemClock: skipping {duration:?} sleep on wasm32");
    }
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    sleeps: Vec<Duration>,
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can hand one clone to the frame
/// loop and keep another to advance time and inspect the recorded sleeps.
/// `sleep` advances the shared time by the requested duration.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ManualState>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.state.borrow_mut().now += duration;
    }

    /// Every duration passed to [`Clock::sleep`], in call order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }

    #[must_use]
    pub fn total_slept(&self) -> Duration {
        self.state.borrow().sleeps.iter().sum()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn sleep(&mut self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.now += duration;
        state.sleeps.push(duration);
    }
}
