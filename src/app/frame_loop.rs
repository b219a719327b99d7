use std::time::Duration;

use crate::app::clock::{Clock, SystemClock};
use crate::app::input::{EventSource, Input, InputEvent, NoEvents};
use crate::assets::AssetServer;
use crate::errors::Result;
use crate::projector::{Projector, RenderData};
use crate::scene::Scene;
use crate::settings::{FrameLoopSettings, Viewport};
use crate::utils::{FpsCounter, Timer};

/// What the update callback sees each frame.
pub struct FrameContext<'a> {
    pub scene: &'a mut Scene,
    pub assets: &'a AssetServer,
    pub input: &'a Input,
    /// Seconds since the previous frame started.
    pub dt: f32,
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Zero-based frame index.
    pub frame: u64,
}

/// Consumer of each frame's projection, typically a rasterizer.
pub trait FrameSink {
    fn present(&mut self, data: &RenderData);
}

impl<F> FrameSink for F
where
    F: FnMut(&RenderData),
{
    fn present(&mut self, data: &RenderData) {
        self(data);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// An [`InputEvent::Quit`] was polled.
    Quit,
    /// The update callback returned `false`.
    Requested,
    /// `max_frames` frames were presented.
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoopSummary {
    /// Frames presented to the sink.
    pub frames: u64,
    /// Clock time from the start of the loop to the stop.
    pub elapsed: Duration,
    pub reason: StopReason,
}

/// Drives update, world-matrix refresh, projection and presentation once per
/// frame, pacing to the configured target frame rate.
///
/// ```rust,ignore
/// let mut frame_loop = FrameLoop::with_system_clock(FrameLoopSettings::default());
/// let summary = frame_loop.run(&mut scene, &assets, &mut projector,
///     |ctx| {
///         // animate ctx.scene
///         true
///     },
///     |data: &RenderData| {
///         // draw data.elements back to front
///     },
/// )?;
/// ```
pub struct FrameLoop<C: Clock = SystemClock, E: EventSource = NoEvents> {
    settings: FrameLoopSettings,
    clock: C,
    events: E,
    input: Input,
    timer: Timer,
    fps: FpsCounter,
    frames: u64,
}

impl FrameLoop {
    #[must_use]
    pub fn with_system_clock(settings: FrameLoopSettings) -> Self {
        Self::new(settings, SystemClock::new(), NoEvents)
    }
}

impl<C: Clock, E: EventSource> FrameLoop<C, E> {
    pub fn new(settings: FrameLoopSettings, clock: C, events: E) -> Self {
        let timer = Timer::new(clock.now());
        Self {
            settings,
            clock,
            events,
            input: Input::new(),
            timer,
            fps: FpsCounter::new(),
            frames: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &FrameLoopSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    #[inline]
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Frames presented since construction.
    #[inline]
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs frames until quit, the update callback returns `false`, or the
    /// frame limit is reached. Projection errors abort the loop.
    pub fn run<U, S>(
        &mut self,
        scene: &mut Scene,
        assets: &AssetServer,
        projector: &mut Projector,
        mut update: U,
        mut sink: S,
    ) -> Result<FrameLoopSummary>
    where
        U: FnMut(&mut FrameContext<'_>) -> bool,
        S: FrameSink,
    {
        let start = self.clock.now();
        self.timer = Timer::new(start);
        let first_frame = self.frames;

        log::debug!("Frame loop started ({:?})", self.settings);

        let reason = loop {
            if let Some(reason) = self.run_frame(scene, assets, projector, &mut update, &mut sink)? {
                break reason;
            }
        };

        let summary = FrameLoopSummary {
            frames: self.frames - first_frame,
            elapsed: self.clock.now().saturating_sub(start),
            reason,
        };
        log::debug!("Frame loop stopped: {summary:?}");
        Ok(summary)
    }

    /// Runs a single frame. Returns `Some` when the loop should stop; a frame
    /// that stops presents nothing.
    pub fn run_frame<U, S>(
        &mut self,
        scene: &mut Scene,
        assets: &AssetServer,
        projector: &mut Projector,
        update: &mut U,
        sink: &mut S,
    ) -> Result<Option<StopReason>>
    where
        U: FnMut(&mut FrameContext<'_>) -> bool,
        S: FrameSink,
    {
        if self
            .settings
            .max_frames
            .is_some_and(|max| self.frames >= max)
        {
            return Ok(Some(StopReason::FrameLimit));
        }

        let frame_start = self.clock.now();
        self.timer.tick(frame_start);

        while let Some(event) = self.events.poll_event() {
            if event == InputEvent::Quit {
                return Ok(Some(StopReason::Quit));
            }
            if let InputEvent::Resized { width, height } = event {
                Self::apply_resize(scene, projector, width, height)?;
            }
            self.input.handle_event(&event);
        }

        let keep_running = {
            let mut ctx = FrameContext {
                scene: &mut *scene,
                assets,
                input: &self.input,
                dt: self.timer.dt_seconds(),
                elapsed: self.timer.elapsed_seconds(),
                frame: self.frames,
            };
            update(&mut ctx)
        };
        self.input.end_frame();
        if !keep_running {
            return Ok(Some(StopReason::Requested));
        }

        scene.update_matrix_world();
        let data = projector.project_active(scene, assets)?;
        sink.present(data);
        self.frames += 1;

        self.pace(frame_start);

        if self.settings.report_fps
            && let Some(fps) = self.fps.update(self.timer.delta)
        {
            log::debug!("FPS: {fps:.1}");
        }

        Ok(None)
    }

    // Sleeps away whatever is left of the target interval.
    fn pace(&mut self, frame_start: Duration) {
        let Some(interval) = self.settings.target_frame_interval() else {
            return;
        };
        let spent = self.clock.now().saturating_sub(frame_start);
        if spent < interval {
            self.clock.sleep(interval - spent);
        }
    }

    fn apply_resize(scene: &mut Scene, projector: &mut Projector, width: u32, height: u32) -> Result<()> {
        // minimized windows report 0x0
        if width == 0 || height == 0 {
            return Ok(());
        }
        let viewport = Viewport::new(width, height);
        projector.set_viewport(viewport)?;
        if let Some((_, camera)) = scene.active_camera_bundle_mut() {
            camera.aspect = viewport.aspect();
            camera.update_projection_matrix();
        }
        Ok(())
    }
}
