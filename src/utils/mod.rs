//! Utility Module
//!
//! - [`Timer`]: frame delta and elapsed time from clock readings
//! - [`FpsCounter`]: frame rate averaged over one-second windows
//!
//! Both are fed durations rather than reading the system clock, so the
//! [`FrameLoop`](crate::app::FrameLoop) can drive them from an injected clock.

pub mod fps_counter;
pub mod time;

pub use fps_counter::FpsCounter;
pub use time::Timer;
