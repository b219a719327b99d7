//! Projection output.
//!
//! A [`RenderData`] is owned by its [`Projector`](crate::projector::Projector)
//! and refilled in place on every projection; buffers keep their capacity so
//! a steady-state frame does not allocate.

use std::ops::Range;

use glam::{Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::assets::MaterialHandle;
use crate::scene::{NodeHandle, ObjectType};

/// Object-level entry: one per accepted mesh, line or sprite node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableObject {
    pub node: NodeHandle,
    pub object_type: ObjectType,
    /// Camera-space depth of the node's world position (positive in front).
    pub z: f32,
    pub render_order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderableVertex {
    pub position_world: Vec3,
    /// `xyz` after the perspective divide, `w` is the clip-space w before it.
    pub position_ndc: Vec4,
    /// Pixels, origin top-left.
    pub position_screen: Vec2,
    pub visible: bool,
}

impl RenderableVertex {
    /// NDC position on the screen plane.
    #[inline]
    #[must_use]
    pub fn ndc_xy(&self) -> Vec2 {
        Vec2::new(self.position_ndc.x, self.position_ndc.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderableFace {
    pub node: NodeHandle,
    pub face_index: usize,
    pub vertices: SmallVec<[RenderableVertex; 4]>,
    pub normal_world: Vec3,
    pub vertex_normals_world: SmallVec<[Vec3; 4]>,
    pub centroid_world: Vec3,
    pub color: Vec4,
    pub vertex_colors: SmallVec<[Vec4; 4]>,
    /// `[channel][corner]`
    pub uvs: SmallVec<[SmallVec<[Vec2; 4]>; 2]>,
    pub material: MaterialHandle,
    pub front_facing: bool,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableLine {
    pub node: NodeHandle,
    pub v1: RenderableVertex,
    pub v2: RenderableVertex,
    pub colors: [Vec4; 2],
    pub material: MaterialHandle,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableSprite {
    pub node: NodeHandle,
    pub position_ndc: Vec4,
    pub position_screen: Vec2,
    /// Half extents in NDC units.
    pub scale: Vec2,
    pub rotation: f32,
    pub material: MaterialHandle,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderableElement {
    Face(RenderableFace),
    Line(RenderableLine),
    Sprite(RenderableSprite),
}

impl RenderableElement {
    #[inline]
    #[must_use]
    pub fn z(&self) -> f32 {
        match self {
            Self::Face(face) => face.z,
            Self::Line(line) => line.z,
            Self::Sprite(sprite) => sprite.z,
        }
    }

    #[inline]
    #[must_use]
    pub fn material(&self) -> MaterialHandle {
        match self {
            Self::Face(face) => face.material,
            Self::Line(line) => line.material,
            Self::Sprite(sprite) => sprite.material,
        }
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        match self {
            Self::Face(face) => face.node,
            Self::Line(line) => line.node,
            Self::Sprite(sprite) => sprite.node,
        }
    }
}

/// Per-projection counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectionStats {
    pub objects_visited: u32,
    pub objects_culled: u32,
    pub faces_emitted: u32,
    pub faces_back_culled: u32,
    /// Faces with a vertex outside the clip volume, or entirely off screen.
    pub faces_clipped: u32,
    /// Faces skipped for bad indices, arity or material index.
    pub faces_invalid: u32,
    pub lines_emitted: u32,
    /// Segments shortened or dropped by clipping.
    pub lines_clipped: u32,
    pub sprites_emitted: u32,
    pub sprites_clipped: u32,
    /// Geometry or material handles that no longer resolve.
    pub missing_assets: u32,
}

#[derive(Debug, Default)]
pub struct RenderData {
    pub objects: Vec<RenderableObject>,
    pub sprites: Vec<RenderableObject>,
    pub lights: Vec<NodeHandle>,
    pub elements: Vec<RenderableElement>,
    pub stats: ProjectionStats,
    // element indices per material; only materials used by the last
    // projection keep an entry
    material_buckets: FxHashMap<MaterialHandle, Vec<usize>>,
}

impl RenderData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every buffer, keeping allocations.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.sprites.clear();
        self.lights.clear();
        self.elements.clear();
        self.stats = ProjectionStats::default();
        // keep last frame's buckets (and their capacity), drop stale ones
        self.material_buckets.retain(|_, bucket| {
            let used = !bucket.is_empty();
            bucket.clear();
            used
        });
    }

    pub(crate) fn rebuild_material_buckets(&mut self) {
        for (index, element) in self.elements.iter().enumerate() {
            self.material_buckets
                .entry(element.material())
                .or_default()
                .push(index);
        }
        self.material_buckets.retain(|_, bucket| !bucket.is_empty());
    }

    /// Element indices using `material`, in element order. Empty unless
    /// material bucketing is enabled.
    #[must_use]
    pub fn bucket(&self, material: MaterialHandle) -> &[usize] {
        self.material_buckets
            .get(&material)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Non-empty material buckets, in no particular order.
    pub fn buckets(&self) -> impl Iterator<Item = (MaterialHandle, &[usize])> + '_ {
        self.material_buckets
            .iter()
            .filter(|(_, indices)| !indices.is_empty())
            .map(|(&material, indices)| (material, indices.as_slice()))
    }

    /// Consecutive element ranges sharing one material, in draw order.
    ///
    /// A backend switches material state once per run.
    pub fn material_runs(&self) -> impl Iterator<Item = (MaterialHandle, Range<usize>)> + '_ {
        let mut start = 0;
        std::iter::from_fn(move || {
            let material = self.elements.get(start)?.material();
            let len = self.elements[start..]
                .iter()
                .take_while(|element| element.material() == material)
                .count();
            let range = start..start + len;
            start += len;
            Some((material, range))
        })
    }
}

/// Stable painter's sort: ascending `render_order`, then descending `z`
/// (farthest first). Equal keys keep their insertion order.
pub fn painter_sort_objects(objects: &mut [RenderableObject]) {
    objects.sort_by(|a, b| {
        a.render_order
            .cmp(&b.render_order)
            .then_with(|| b.z.total_cmp(&a.z))
    });
}

/// Stable painter's sort by descending `z`.
pub fn painter_sort_elements(elements: &mut [RenderableElement]) {
    elements.sort_by(|a, b| b.z().total_cmp(&a.z()));
}
