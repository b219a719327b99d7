//! Frame Loop Tests
//!
//! Tests for:
//! - Stop conditions (quit event, update callback, frame limit)
//! - Frame pacing against an injected clock
//! - Per-frame timing passed to the update callback
//! - Resize and input event handling
//! - Error propagation from projection
//! - Settings serialization

use std::collections::VecDeque;
use std::time::Duration;

use glam::{Vec2, Vec3, Vec4};

use lumen::app::{FrameLoop, InputEvent, Key, ManualClock, MouseButton, StopReason};
use lumen::assets::AssetServer;
use lumen::errors::{LumenError, ProjectorError};
use lumen::projector::{Projector, RenderData};
use lumen::resources::{Geometry, Material, Mesh};
use lumen::scene::{Camera, NodeHandle, Scene};
use lumen::settings::{FrameLoopSettings, ProjectorSettings, Viewport};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Fixtures
// ============================================================================

struct World {
    scene: Scene,
    assets: AssetServer,
    projector: Projector,
    cube: NodeHandle,
}

fn world() -> World {
    let mut scene = Scene::new();
    let mut assets = AssetServer::new();

    let camera = scene.add_camera(Camera::new_perspective(60.0, 1.0, 0.1, 100.0));
    scene.get_node_mut(camera).unwrap().transform.position = Vec3::new(0.0, 0.0, 5.0);

    let geometry = assets.add_geometry(Geometry::new_box(1.0, 1.0, 1.0));
    let material = assets.add_material(Material::new_basic(Vec4::ONE));
    let cube = scene.add_mesh(Mesh::new(geometry, material));

    let projector =
        Projector::new(ProjectorSettings::default().with_viewport(Viewport::new(100, 100))).unwrap();

    World {
        scene,
        assets,
        projector,
        cube,
    }
}

fn no_events() -> VecDeque<InputEvent> {
    VecDeque::new()
}

fn settings(target_fps: Option<u32>, max_frames: Option<u64>) -> FrameLoopSettings {
    FrameLoopSettings::default()
        .with_target_fps(target_fps)
        .with_max_frames(max_frames)
}

// ============================================================================
// Stop Conditions
// ============================================================================

#[test]
fn quit_event_stops_before_update() {
    let mut w = world();
    let events = VecDeque::from([InputEvent::Quit]);
    let mut frame_loop = FrameLoop::new(settings(None, None), ManualClock::new(), events);

    let mut updates = 0;
    let mut presented = 0;
    let summary = frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |_| {
                updates += 1;
                true
            },
            |_: &RenderData| presented += 1,
        )
        .unwrap();

    assert_eq!(summary.reason, StopReason::Quit);
    assert_eq!(summary.frames, 0);
    assert_eq!(updates, 0);
    assert_eq!(presented, 0);
}

#[test]
fn update_returning_false_stops_the_loop() {
    let mut w = world();
    let mut frame_loop = FrameLoop::new(settings(None, None), ManualClock::new(), no_events());

    let mut presented = 0;
    let summary = frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |ctx| ctx.frame < 3,
            |_: &RenderData| presented += 1,
        )
        .unwrap();

    assert_eq!(summary.reason, StopReason::Requested);
    assert_eq!(summary.frames, 3);
    assert_eq!(presented, 3, "the stopping frame presents nothing");
}

#[test]
fn frame_limit_stops_the_loop() {
    let mut w = world();
    let mut frame_loop = FrameLoop::new(settings(None, Some(4)), ManualClock::new(), no_events());

    let mut element_counts = Vec::new();
    let summary = frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |_| true,
            |data: &RenderData| element_counts.push(data.elements.len()),
        )
        .unwrap();

    assert_eq!(summary.reason, StopReason::FrameLimit);
    assert_eq!(summary.frames, 4);
    assert_eq!(frame_loop.frames(), 4);
    assert_eq!(element_counts, vec![1; 4], "cube shows one face head-on");
}

// ============================================================================
// Pacing & Timing
// ============================================================================

#[test]
fn pacing_sleeps_the_remaining_interval() {
    let mut w = world();
    let clock = ManualClock::new();
    let work = clock.clone();
    let mut frame_loop = FrameLoop::new(settings(Some(50), Some(3)), clock.clone(), no_events());

    let summary = frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |_| {
                work.advance(Duration::from_millis(5));
                true
            },
            |_: &RenderData| {},
        )
        .unwrap();

    assert_eq!(clock.sleeps(), vec![Duration::from_millis(15); 3]);
    assert_eq!(summary.elapsed, Duration::from_millis(60));
}

#[test]
fn overrunning_frames_do_not_sleep() {
    let mut w = world();
    let clock = ManualClock::new();
    let work = clock.clone();
    let mut frame_loop = FrameLoop::new(settings(Some(50), Some(2)), clock.clone(), no_events());

    frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |_| {
                work.advance(Duration::from_millis(30));
                true
            },
            |_: &RenderData| {},
        )
        .unwrap();

    assert!(clock.sleeps().is_empty());
}

#[test]
fn uncapped_loop_never_sleeps() {
    let mut w = world();
    let clock = ManualClock::new();
    let mut frame_loop = FrameLoop::new(settings(None, Some(5)), clock.clone(), no_events());

    frame_loop
        .run(&mut w.scene, &w.assets, &mut w.projector, |_| true, |_: &RenderData| {})
        .unwrap();

    assert_eq!(clock.total_slept(), Duration::ZERO);
}

#[test]
fn update_sees_frame_timing() {
    let mut w = world();
    let clock = ManualClock::new();
    let work = clock.clone();
    let mut frame_loop = FrameLoop::new(settings(Some(50), Some(3)), clock, no_events());

    let mut timings = Vec::new();
    frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |ctx| {
                timings.push((ctx.frame, ctx.dt, ctx.elapsed));
                work.advance(Duration::from_millis(5));
                true
            },
            |_: &RenderData| {},
        )
        .unwrap();

    assert_eq!(timings.len(), 3);
    let expected = [(0, 0.0, 0.0), (1, 0.02, 0.02), (2, 0.02, 0.04)];
    for ((frame, dt, elapsed), (e_frame, e_dt, e_elapsed)) in timings.into_iter().zip(expected) {
        assert_eq!(frame, e_frame);
        assert!(approx(dt, e_dt), "frame {frame}: dt {dt}");
        assert!(approx(elapsed, e_elapsed), "frame {frame}: elapsed {elapsed}");
    }
}

// ============================================================================
// Scene Updates & Events
// ============================================================================

#[test]
fn update_changes_reach_the_projection() {
    let mut w = world();
    let cube = w.cube;
    let mut frame_loop = FrameLoop::new(settings(None, Some(2)), ManualClock::new(), no_events());

    let mut depths = Vec::new();
    frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |ctx| {
                if ctx.frame == 1 {
                    ctx.scene.get_node_mut(cube).unwrap().transform.position.z = -5.0;
                }
                true
            },
            |data: &RenderData| depths.push(data.objects[0].z),
        )
        .unwrap();

    assert!(approx(depths[0], 5.0));
    assert!(approx(depths[1], 10.0), "world matrices refreshed before projection");
}

#[test]
fn resize_updates_viewport_and_camera_aspect() {
    let mut w = world();
    let events = VecDeque::from([InputEvent::Resized {
        width: 200,
        height: 100,
    }]);
    let mut frame_loop = FrameLoop::new(settings(None, Some(1)), ManualClock::new(), events);

    frame_loop
        .run(&mut w.scene, &w.assets, &mut w.projector, |_| true, |_: &RenderData| {})
        .unwrap();

    assert_eq!(w.projector.settings().viewport, Viewport::new(200, 100));
    assert!(approx(w.scene.active_camera().unwrap().aspect, 2.0));
    assert_eq!(frame_loop.input().screen_size, Vec2::new(200.0, 100.0));
}

#[test]
fn zero_sized_resize_is_ignored() {
    let mut w = world();
    let events = VecDeque::from([InputEvent::Resized { width: 0, height: 0 }]);
    let mut frame_loop = FrameLoop::new(settings(None, Some(1)), ManualClock::new(), events);

    frame_loop
        .run(&mut w.scene, &w.assets, &mut w.projector, |_| true, |_: &RenderData| {})
        .unwrap();

    assert_eq!(w.projector.settings().viewport, Viewport::new(100, 100));
}

#[test]
fn input_events_reach_the_update_callback() {
    let mut w = world();
    let events = VecDeque::from([
        InputEvent::CursorMoved { x: 10.0, y: 20.0 },
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        },
    ]);
    let mut frame_loop = FrameLoop::new(settings(None, Some(1)), ManualClock::new(), events);

    let mut seen = None;
    frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |ctx| {
                seen = Some((ctx.input.cursor_position, ctx.input.is_button_pressed(MouseButton::Left)));
                true
            },
            |_: &RenderData| {},
        )
        .unwrap();

    assert_eq!(seen, Some((Vec2::new(10.0, 20.0), true)));
}

#[test]
fn key_press_reaches_the_update_callback() {
    let mut w = world();
    let events = VecDeque::from([InputEvent::Key {
        key: Key::Space,
        pressed: true,
    }]);
    let mut frame_loop = FrameLoop::new(settings(None, Some(2)), ManualClock::new(), events);

    let mut seen = Vec::new();
    frame_loop
        .run(
            &mut w.scene,
            &w.assets,
            &mut w.projector,
            |ctx| {
                seen.push((ctx.input.get_key(Key::Space), ctx.input.get_key_down(Key::Space)));
                true
            },
            |_: &RenderData| {},
        )
        .unwrap();

    assert_eq!(seen, vec![(true, true), (true, false)], "the press edge lasts one frame");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn projection_errors_abort_the_loop() {
    let mut scene = Scene::new();
    let assets = AssetServer::new();
    let mut projector = Projector::new(ProjectorSettings::default()).unwrap();
    let mut frame_loop = FrameLoop::new(settings(None, Some(10)), ManualClock::new(), no_events());

    let result = frame_loop.run(&mut scene, &assets, &mut projector, |_| true, |_: &RenderData| {});

    assert_eq!(
        result.unwrap_err(),
        LumenError::Projector(ProjectorError::NoActiveCamera)
    );
    assert_eq!(frame_loop.frames(), 0);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn settings_deserialize_with_defaults() {
    let settings: FrameLoopSettings = serde_json::from_str(r#"{ "target_fps": 30 }"#).unwrap();
    assert_eq!(settings.target_fps, Some(30));
    assert_eq!(settings.max_frames, None);
    assert!(settings.report_fps);

    let projector: ProjectorSettings =
        serde_json::from_str(r#"{ "viewport": { "width": 640, "height": 480 }, "sort_elements": false }"#)
            .unwrap();
    assert_eq!(projector.viewport, Viewport::new(640, 480));
    assert!(!projector.sort_elements);
    assert!(projector.sort_objects);
    assert!(projector.frustum_culling);
}

#[test]
fn settings_round_trip_through_json() {
    let original = ProjectorSettings::default()
        .with_viewport(Viewport::new(320, 240))
        .with_frustum_culling(false);
    let json = serde_json::to_string(&original).unwrap();
    let restored: ProjectorSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn target_frame_interval_follows_fps() {
    assert_eq!(
        settings(Some(50), None).target_frame_interval(),
        Some(Duration::from_millis(20))
    );
    assert_eq!(settings(None, None).target_frame_interval(), None);
    assert_eq!(settings(Some(0), None).target_frame_interval(), None);
}
