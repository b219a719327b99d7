//! Headless frame loop: a ring of rotating cubes around a sprite, projected
//! at 60 fps for a few seconds. Run with `RUST_LOG=debug` to see frame stats.

use glam::{Quat, Vec3, Vec4};

use lumen::app::FrameLoop;
use lumen::assets::AssetServer;
use lumen::projector::{Projector, RenderData, RenderableElement};
use lumen::resources::{Geometry, Material, Mesh, Sprite};
use lumen::scene::{Camera, Light, Scene};
use lumen::settings::{FrameLoopSettings, ProjectorSettings, Viewport};

const CUBES: usize = 8;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = Scene::new();
    let mut assets = AssetServer::new();

    // === 1. Assets ===
    let geometry = assets.add_geometry(Geometry::new_box(1.0, 1.0, 1.0));
    let sprite_material = assets.add_material(Material::new_sprite(Vec4::new(1.0, 0.9, 0.2, 1.0)));

    // === 2. A ring of cubes under one pivot ===
    let pivot = scene.create_node_with_name("Pivot");
    for i in 0..CUBES {
        let hue = i as f32 / CUBES as f32;
        let material = assets.add_material(Material::new_lambert(Vec4::new(hue, 0.4, 1.0 - hue, 1.0)));
        let cube = scene.add_mesh_to_parent(Mesh::new(geometry, material), pivot)?;

        let angle = hue * std::f32::consts::TAU;
        if let Some(node) = scene.get_node_mut(cube) {
            node.transform.position = Vec3::new(angle.cos() * 3.0, 0.0, angle.sin() * 3.0);
        }
    }
    scene.add_sprite(Sprite::new(sprite_material));
    scene.add_light(Light::new_directional(Vec3::ONE, 1.0));

    // === 3. Camera ===
    let camera = scene.add_camera(Camera::new_perspective(45.0, 1280.0 / 720.0, 0.1, 100.0));
    if let Some(node) = scene.get_node_mut(camera) {
        node.transform.position = Vec3::new(0.0, 4.0, 10.0);
        node.transform.look_at(Vec3::ZERO, Vec3::Y);
    }

    // === 4. Run ===
    let mut projector =
        Projector::new(ProjectorSettings::default().with_viewport(Viewport::new(1280, 720)))?;
    let mut frame_loop = FrameLoop::with_system_clock(
        FrameLoopSettings::default()
            .with_target_fps(Some(60))
            .with_max_frames(Some(180)),
    );

    let summary = frame_loop.run(
        &mut scene,
        &assets,
        &mut projector,
        |ctx| {
            if let Some(node) = ctx.scene.get_node_mut(pivot) {
                node.transform.rotation = Quat::from_rotation_y(ctx.elapsed * 0.8);
            }
            true
        },
        |data: &RenderData| {
            let faces = data
                .elements
                .iter()
                .filter(|e| matches!(e, RenderableElement::Face(_)))
                .count();
            log::trace!(
                "{} objects, {faces} faces, {} elements ({} culled)",
                data.objects.len(),
                data.elements.len(),
                data.stats.objects_culled
            );
        },
    )?;

    log::info!(
        "Presented {} frames in {:.2?} ({:?})",
        summary.frames,
        summary.elapsed,
        summary.reason
    );
    Ok(())
}
