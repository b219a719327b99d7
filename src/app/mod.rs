//! Frame loop
//!
//! [`FrameLoop`] strings the per-frame pipeline together:
//!
//! 1. drain pending [`InputEvent`]s from the [`EventSource`]
//! 2. call the update callback with a [`FrameContext`]
//! 3. `Scene::update_matrix_world`
//! 4. project with the active camera and hand the result to a [`FrameSink`]
//! 5. sleep the rest of the frame through the injected [`Clock`]

pub mod clock;
pub mod frame_loop;
pub mod input;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_loop::{FrameContext, FrameLoop, FrameLoopSummary, FrameSink, StopReason};
pub use input::{EventSource, Input, InputEvent, Key, MouseButton, NoEvents};
