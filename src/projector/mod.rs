//! Projector
//!
//! Turns a scene plus a camera into a flat [`RenderData`]:
//!
//! 1. **Reset** the pooled output buffers
//! 2. **Walk** the graph depth-first (pre-order), pruning invisible subtrees
//!    and frustum-culling meshes and lines
//! 3. **Sort** objects back to front (optional)
//! 4. **Decompose** meshes into faces, lines into clipped segments and
//!    sprites into billboards, all in screen space
//! 5. **Sort** elements back to front (optional), then bucket them by material
//!
//! The projector never mutates the scene or the assets; projecting twice
//! without changes yields identical output. World matrices and camera
//! matrices are read as left by the last
//! [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world).
//!
//! Clip space follows the OpenGL convention (`-w <= x, y, z <= w`); NDC has
//! y up, screen space has y down.

pub mod clipping;
pub mod render_data;

pub use render_data::{
    ProjectionStats, RenderData, RenderableElement, RenderableFace, RenderableLine,
    RenderableObject, RenderableSprite, RenderableVertex, painter_sort_elements,
    painter_sort_objects,
};

use glam::{Affine3A, Mat4, Vec2, Vec3, Vec4};
use smallvec::SmallVec;

use crate::assets::AssetServer;
use crate::errors::{ProjectorError, Result, SceneError};
use crate::math;
use crate::resources::material::{Side, VertexColors};
use crate::resources::mesh::LineMode;
use crate::scene::camera::Camera;
use crate::scene::frustum::Frustum;
use crate::scene::node::{Node, NodeKind, ObjectType};
use crate::scene::{NodeHandle, Scene};
use crate::settings::{ProjectorSettings, Viewport};

/// Scratch buffers reused between projections.
#[derive(Debug, Default)]
struct Scratch {
    stack: Vec<NodeHandle>,
    vertices: Vec<RenderableVertex>,
    clip: Vec<Vec4>,
    world: Vec<Vec3>,
}

/// Scene-to-screen projector with pooled output.
///
/// # Example
///
/// ```rust,ignore
/// let mut projector = Projector::new(ProjectorSettings::default())?;
/// scene.update_matrix_world();
/// let data = projector.project_active(&scene, &assets)?;
/// for element in &data.elements {
///     // draw back to front
/// }
/// ```
#[derive(Debug)]
pub struct Projector {
    settings: ProjectorSettings,
    render_data: RenderData,
    scratch: Scratch,
}

impl Projector {
    /// Fails with [`ProjectorError::ZeroViewport`] for an empty viewport.
    pub fn new(settings: ProjectorSettings) -> Result<Self> {
        validate_viewport(settings.viewport)?;
        Ok(Self {
            settings,
            render_data: RenderData::new(),
            scratch: Scratch::default(),
        })
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ProjectorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ProjectorSettings) -> Result<()> {
        validate_viewport(settings.viewport)?;
        self.settings = settings;
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        validate_viewport(viewport)?;
        self.settings.viewport = viewport;
        Ok(())
    }

    /// Output of the last successful projection.
    #[inline]
    #[must_use]
    pub fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    /// Projects with the scene's active camera.
    pub fn project_active(&mut self, scene: &Scene, assets: &AssetServer) -> Result<&RenderData> {
        let handle = scene.active_camera.ok_or(ProjectorError::NoActiveCamera)?;
        self.project_scene(scene, assets, handle)
    }

    /// Projects with the camera carried by node `camera`.
    pub fn project_scene(
        &mut self,
        scene: &Scene,
        assets: &AssetServer,
        camera: NodeHandle,
    ) -> Result<&RenderData> {
        let node = scene.get_node(camera).ok_or(SceneError::NodeNotFound(camera))?;
        let camera = node.camera().ok_or(SceneError::NotACamera(camera))?;
        self.project_with_camera(scene, assets, camera)
    }

    /// Projects with an explicit camera, which need not be part of `scene`.
    pub fn project_with_camera(
        &mut self,
        scene: &Scene,
        assets: &AssetServer,
        camera: &Camera,
    ) -> Result<&RenderData> {
        camera.validate()?;

        let data = &mut self.render_data;
        data.clear();

        let pass = ProjectionPass::new(scene, assets, camera, &self.settings);
        pass.collect_objects(data, &mut self.scratch);

        if self.settings.sort_objects {
            painter_sort_objects(&mut data.objects);
            painter_sort_objects(&mut data.sprites);
        }

        pass.project_objects(data, &mut self.scratch);

        if self.settings.sort_elements {
            painter_sort_elements(&mut data.elements);
        }
        if self.settings.bucket_by_material {
            data.rebuild_material_buckets();
        }

        log::trace!(
            "Projected {} objects into {} elements ({:?})",
            data.objects.len() + data.sprites.len(),
            data.elements.len(),
            data.stats
        );

        Ok(&self.render_data)
    }
}

fn validate_viewport(viewport: Viewport) -> std::result::Result<(), ProjectorError> {
    if viewport.is_empty() {
        return Err(ProjectorError::ZeroViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}

/// Read-only state of one projection.
struct ProjectionPass<'a> {
    scene: &'a Scene,
    assets: &'a AssetServer,
    settings: &'a ProjectorSettings,
    frustum: &'a Frustum,
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
}

impl<'a> ProjectionPass<'a> {
    fn new(
        scene: &'a Scene,
        assets: &'a AssetServer,
        camera: &'a Camera,
        settings: &'a ProjectorSettings,
    ) -> Self {
        Self {
            scene,
            assets,
            settings,
            frustum: camera.frustum(),
            view: *camera.view_matrix(),
            projection: *camera.projection_matrix(),
            view_projection: *camera.view_projection_matrix(),
        }
    }

    // ========================================================================
    // Graph walk
    // ========================================================================

    fn collect_objects(&self, data: &mut RenderData, scratch: &mut Scratch) {
        let stack = &mut scratch.stack;
        stack.clear();
        stack.extend(self.scene.root_nodes().iter().rev());

        while let Some(handle) = stack.pop() {
            let Some(node) = self.scene.get_node(handle) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            stack.extend(node.children().iter().rev());

            let object_type = node.object_type();
            if !self.settings.object_mask.contains(object_type.mask()) {
                continue;
            }

            match object_type {
                ObjectType::Mesh | ObjectType::Line => {
                    data.stats.objects_visited += 1;
                    if self.is_culled(node) {
                        data.stats.objects_culled += 1;
                        continue;
                    }
                    data.objects.push(self.object_entry(handle, node, object_type));
                }
                ObjectType::Sprite => {
                    data.stats.objects_visited += 1;
                    data.sprites.push(self.object_entry(handle, node, object_type));
                }
                ObjectType::Light => data.lights.push(handle),
                ObjectType::Empty | ObjectType::Camera => {}
            }
        }
    }

    fn object_entry(&self, handle: NodeHandle, node: &Node, object_type: ObjectType) -> RenderableObject {
        RenderableObject {
            node: handle,
            object_type,
            z: math::view_depth(&self.view, node.transform.world_position()),
            render_order: node.render_order,
        }
    }

    /// Frustum test against the geometry's bounding sphere. Geometry without
    /// a computed sphere is never culled.
    fn is_culled(&self, node: &Node) -> bool {
        if !self.settings.frustum_culling || !node.frustum_culled {
            return false;
        }

        let geometry_handle = match &node.kind {
            NodeKind::Mesh(mesh) => mesh.geometry,
            NodeKind::Line(line) => line.geometry,
            _ => return false,
        };
        // Missing geometry is reported during decomposition
        self.assets
            .get_geometry(geometry_handle)
            .and_then(|geometry| geometry.bounding_sphere())
            .is_some_and(|sphere| !self.frustum.intersects_object(node.world_matrix(), sphere))
    }

    // ========================================================================
    // Decomposition
    // ========================================================================

    fn project_objects(&self, data: &mut RenderData, scratch: &mut Scratch) {
        for i in 0..data.objects.len() {
            let object = data.objects[i];
            let Some(node) = self.scene.get_node(object.node) else {
                continue;
            };
            match &node.kind {
                NodeKind::Mesh(_) => self.project_mesh(object.node, node, data, scratch),
                NodeKind::Line(_) => self.project_line(object.node, node, data, scratch),
                _ => {}
            }
        }

        for i in 0..data.sprites.len() {
            let object = data.sprites[i];
            if let Some(node) = self.scene.get_node(object.node) {
                self.project_sprite(object.node, node, data);
            }
        }
    }

    /// Projects a world-space point given its clip-space coordinates.
    fn make_vertex(&self, world: Vec3, clip: Vec4) -> RenderableVertex {
        let inv_w = if clip.w != 0.0 { 1.0 / clip.w } else { 0.0 };
        let ndc = clip.truncate() * inv_w;

        RenderableVertex {
            position_world: world,
            position_ndc: ndc.extend(clip.w),
            position_screen: self.settings.viewport.ndc_to_screen(ndc.truncate()),
            visible: clip.w > 0.0 && (-1.0..=1.0).contains(&ndc.z),
        }
    }

    fn project_mesh(&self, handle: NodeHandle, node: &Node, data: &mut RenderData, scratch: &mut Scratch) {
        let NodeKind::Mesh(mesh) = &node.kind else {
            return;
        };
        let Some(geometry) = self.assets.get_geometry(mesh.geometry) else {
            log::warn!("Node {handle:?} refers to missing geometry {:?}", mesh.geometry);
            data.stats.missing_assets += 1;
            return;
        };

        let world = node.world_matrix();
        let model_view_projection = self.view_projection * Mat4::from(*world);
        let normal_matrix = math::normal_matrix(world);

        scratch.vertices.clear();
        scratch.vertices.extend(geometry.vertices().iter().map(|&local| {
            let clip = model_view_projection * local.extend(1.0);
            self.make_vertex(world.transform_point3(local), clip)
        }));
        let vertices = &scratch.vertices;

        for (face_index, face) in geometry.faces.iter().enumerate() {
            if !face.is_valid_for(vertices.len()) {
                log::debug!(
                    "Skipping face {face_index} of node {handle:?}: indices {:?} invalid for {} vertices",
                    face.indices,
                    vertices.len()
                );
                data.stats.faces_invalid += 1;
                continue;
            }

            let Some(material_handle) = mesh.material.resolve(face.material_index) else {
                log::debug!(
                    "Skipping face {face_index} of node {handle:?}: no material at index {}",
                    face.material_index
                );
                data.stats.faces_invalid += 1;
                continue;
            };
            let Some(material) = self.assets.get_material(material_handle) else {
                log::warn!("Node {handle:?} refers to missing material {material_handle:?}");
                data.stats.missing_assets += 1;
                continue;
            };
            if !material.visible {
                continue;
            }

            let face_vertices: SmallVec<[RenderableVertex; 4]> =
                face.indices.iter().map(|&i| vertices[i as usize]).collect();

            if !face_vertices.iter().all(|v| v.visible) || !on_screen(&face_vertices) {
                data.stats.faces_clipped += 1;
                continue;
            }

            let [a, b, c] = [0, 1, 2].map(|i| face_vertices[i].ndc_xy());
            let front_facing = math::signed_area(a, b, c) > 0.0;
            if !material.keeps_face(front_facing) {
                data.stats.faces_back_culled += 1;
                continue;
            }

            let flip = if material.side == Side::Back { -1.0 } else { 1.0 };
            let to_world_normal = |n: Vec3| (normal_matrix * n).normalize_or_zero() * flip;

            let centroid_world = face_vertices.iter().map(|v| v.position_world).sum::<Vec3>()
                / face_vertices.len() as f32;

            let uvs = geometry
                .face_vertex_uvs
                .iter()
                .filter_map(|channel| channel.get(face_index).cloned())
                .collect();

            data.elements.push(RenderableElement::Face(RenderableFace {
                node: handle,
                face_index,
                normal_world: to_world_normal(face.normal),
                vertex_normals_world: face.vertex_normals.iter().map(|&n| to_world_normal(n)).collect(),
                centroid_world,
                color: match material.vertex_colors {
                    VertexColors::Face => face.color,
                    _ => material.color,
                },
                vertex_colors: match material.vertex_colors {
                    VertexColors::Vertex => face.vertex_colors.clone(),
                    _ => SmallVec::new(),
                },
                uvs,
                material: material_handle,
                front_facing,
                z: math::view_depth(&self.view, centroid_world),
                vertices: face_vertices,
            }));
            data.stats.faces_emitted += 1;
        }
    }

    fn project_line(&self, handle: NodeHandle, node: &Node, data: &mut RenderData, scratch: &mut Scratch) {
        let NodeKind::Line(line) = &node.kind else {
            return;
        };
        let Some(geometry) = self.assets.get_geometry(line.geometry) else {
            log::warn!("Node {handle:?} refers to missing geometry {:?}", line.geometry);
            data.stats.missing_assets += 1;
            return;
        };
        let Some(material) = self.assets.get_material(line.material) else {
            log::warn!("Node {handle:?} refers to missing material {:?}", line.material);
            data.stats.missing_assets += 1;
            return;
        };
        if !material.visible {
            return;
        }

        let world = node.world_matrix();
        let model_view_projection = self.view_projection * Mat4::from(*world);

        scratch.clip.clear();
        scratch.world.clear();
        for &local in geometry.vertices() {
            scratch.clip.push(model_view_projection * local.extend(1.0));
            scratch.world.push(world.transform_point3(local));
        }

        let use_vertex_colors =
            material.vertex_colors == VertexColors::Vertex && geometry.colors.len() == geometry.vertices().len();
        let color_at = |i: usize| {
            if use_vertex_colors {
                geometry.colors[i]
            } else {
                material.color
            }
        };

        let step = match line.mode {
            LineMode::Strip => 1,
            LineMode::Pieces => 2,
        };

        let count = scratch.clip.len();
        let mut i = 0;
        while i + 1 < count {
            let (ia, ib) = (i, i + 1);
            i += step;

            let (clip_a, clip_b) = (scratch.clip[ia], scratch.clip[ib]);
            let Some((t0, t1)) = clipping::clip_segment(clip_a, clip_b) else {
                data.stats.lines_clipped += 1;
                continue;
            };
            if t0 > 0.0 || t1 < 1.0 {
                data.stats.lines_clipped += 1;
            }

            let (world_a, world_b) = (scratch.world[ia], scratch.world[ib]);
            let v1 = self.make_vertex(world_a.lerp(world_b, t0), clip_a.lerp(clip_b, t0));
            let v2 = self.make_vertex(world_a.lerp(world_b, t1), clip_a.lerp(clip_b, t1));
            let (color_a, color_b) = (color_at(ia), color_at(ib));

            let z = math::view_depth(&self.view, v1.position_world)
                .max(math::view_depth(&self.view, v2.position_world));

            data.elements.push(RenderableElement::Line(RenderableLine {
                node: handle,
                v1,
                v2,
                colors: [color_a.lerp(color_b, t0), color_a.lerp(color_b, t1)],
                material: line.material,
                z,
            }));
            data.stats.lines_emitted += 1;
        }
    }

    fn project_sprite(&self, handle: NodeHandle, node: &Node, data: &mut RenderData) {
        let NodeKind::Sprite(sprite) = &node.kind else {
            return;
        };
        let Some(material) = self.assets.get_material(sprite.material) else {
            log::warn!("Node {handle:?} refers to missing material {:?}", sprite.material);
            data.stats.missing_assets += 1;
            return;
        };
        if !material.visible {
            return;
        }

        let world = node.world_matrix();
        let world_position = node.transform.world_position();
        let vertex = self.make_vertex(world_position, self.view_projection * world_position.extend(1.0));
        if !vertex.visible {
            data.stats.sprites_clipped += 1;
            return;
        }

        let mut scale = world_axis_scale(world)
            * Vec2::new(self.projection.x_axis.x, self.projection.y_axis.y).abs();
        if material.size_attenuation {
            scale /= vertex.position_ndc.w;
        }

        data.elements.push(RenderableElement::Sprite(RenderableSprite {
            node: handle,
            position_ndc: vertex.position_ndc,
            position_screen: vertex.position_screen,
            scale,
            rotation: sprite.rotation,
            material: sprite.material,
            z: math::view_depth(&self.view, world_position),
        }));
        data.stats.sprites_emitted += 1;
    }
}

/// Whether the NDC bounding rectangle of `vertices` overlaps the screen.
fn on_screen(vertices: &[RenderableVertex]) -> bool {
    let (min, max) = vertices.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), v| {
            let p = v.ndc_xy();
            (min.min(p), max.max(p))
        },
    );
    clipping::rect_intersects_clip(min, max)
}

/// World-space length of the node's local X and Y axes.
fn world_axis_scale(world: &Affine3A) -> Vec2 {
    Vec2::new(world.matrix3.x_axis.length(), world.matrix3.y_axis.length())
}
