use std::borrow::Cow;

use glam::{Vec2, Vec3, Vec4};
use smallvec::{SmallVec, smallvec};
use uuid::Uuid;

use crate::resources::bounds::{BoundingBox, BoundingSphere};
use crate::resources::primitives;

/// A triangle or quad referencing geometry vertices by index.
///
/// `vertex_normals` / `vertex_colors` are either empty or parallel to
/// `indices`.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub indices: SmallVec<[u32; 4]>,
    pub normal: Vec3,
    pub vertex_normals: SmallVec<[Vec3; 4]>,
    pub color: Vec4,
    pub vertex_colors: SmallVec<[Vec4; 4]>,
    /// Index into a per-face material list.
    pub material_index: usize,
}

impl Face {
    fn from_indices(indices: SmallVec<[u32; 4]>) -> Self {
        Self {
            indices,
            normal: Vec3::ZERO,
            vertex_normals: SmallVec::new(),
            color: Vec4::ONE,
            vertex_colors: SmallVec::new(),
            material_index: 0,
        }
    }

    #[must_use]
    pub fn tri(a: u32, b: u32, c: u32) -> Self {
        Self::from_indices(smallvec![a, b, c])
    }

    #[must_use]
    pub fn quad(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self::from_indices(smallvec![a, b, c, d])
    }

    #[must_use]
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_material_index(mut self, material_index: usize) -> Self {
        self.material_index = material_index;
        self
    }

    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.indices.len()
    }

    /// 3 or 4 indices, all below `vertex_count`.
    #[must_use]
    pub fn is_valid_for(&self, vertex_count: usize) -> bool {
        (3..=4).contains(&self.arity()) && self.indices.iter().all(|&i| (i as usize) < vertex_count)
    }
}

/// Vertex and face data shared by any number of mesh or line nodes.
///
/// Bounding volumes are cached: they are only present after
/// [`compute_bounding_box`](Self::compute_bounding_box) /
/// [`compute_bounding_sphere`](Self::compute_bounding_sphere), and every
/// vertex mutation through this type drops them again.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,

    vertices: Vec<Vec3>,
    /// Per-vertex colors (used by lines with vertex colors).
    pub colors: Vec<Vec4>,
    pub faces: Vec<Face>,
    /// `[channel][face][corner]`
    pub face_vertex_uvs: Vec<Vec<SmallVec<[Vec2; 4]>>>,

    bounding_box: Option<BoundingBox>,
    bounding_sphere: Option<BoundingSphere>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Geometry"),
            vertices: Vec::new(),
            colors: Vec::new(),
            faces: Vec::new(),
            face_vertex_uvs: Vec::new(),
            bounding_box: None,
            bounding_sphere: None,
        }
    }

    #[must_use]
    pub fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    // ========================================================================
    // Vertex access
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Mutable vertex access; drops cached bounds.
    pub fn vertices_mut(&mut self) -> &mut Vec<Vec3> {
        self.invalidate_bounds();
        &mut self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.invalidate_bounds();
        self.vertices = vertices;
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, vertex: Vec3) -> u32 {
        self.invalidate_bounds();
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    // ========================================================================
    // Bounding volumes
    // ========================================================================

    pub fn invalidate_bounds(&mut self) {
        self.bounding_box = None;
        self.bounding_sphere = None;
    }

    #[inline]
    #[must_use]
    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn bounding_sphere(&self) -> Option<&BoundingSphere> {
        self.bounding_sphere.as_ref()
    }

    /// Recomputes the cached box. A geometry without vertices has none.
    pub fn compute_bounding_box(&mut self) -> Option<BoundingBox> {
        self.bounding_box = if self.vertices.is_empty() {
            None
        } else {
            Some(BoundingBox::from_points(&self.vertices))
        };
        self.bounding_box
    }

    /// Recomputes the cached sphere: centered on the bounding box center, with
    /// the radius reaching the farthest vertex.
    pub fn compute_bounding_sphere(&mut self) -> Option<BoundingSphere> {
        let center = match self.bounding_box {
            Some(bbox) => bbox.center(),
            None => self.compute_bounding_box()?.center(),
        };

        let max_dist_sq = self
            .vertices
            .iter()
            .map(|v| v.distance_squared(center))
            .fold(0.0_f32, f32::max);

        self.bounding_sphere = Some(BoundingSphere::new(center, max_dist_sq.sqrt()));
        self.bounding_sphere
    }

    /// Recomputes both cached volumes.
    pub fn compute_bounding_volume(&mut self) {
        self.compute_bounding_box();
        self.compute_bounding_sphere();
    }

    // ========================================================================
    // Normals
    // ========================================================================

    /// Sets each face normal from its first three vertices (counter-clockwise
    /// winding faces the normal). Invalid faces get a zero normal.
    pub fn compute_face_normals(&mut self) {
        let vertex_count = self.vertices.len();
        for face in &mut self.faces {
            face.normal = if face.is_valid_for(vertex_count) {
                let [a, b, c] = [0, 1, 2].map(|i| self.vertices[face.indices[i] as usize]);
                (b - a).cross(c - a).normalize_or_zero()
            } else {
                Vec3::ZERO
            };
        }
    }

    /// Smooth per-corner normals: the area-weighted average of the normals of
    /// every face sharing a vertex.
    pub fn compute_vertex_normals(&mut self) {
        let vertex_count = self.vertices.len();
        let mut accumulated = vec![Vec3::ZERO; vertex_count];

        for face in &self.faces {
            if !face.is_valid_for(vertex_count) {
                continue;
            }
            // Fan triangulation; cross products carry the area weighting.
            let first = face.indices[0] as usize;
            for window in face.indices[1..].windows(2) {
                let (b, c) = (window[0] as usize, window[1] as usize);
                let weighted = (self.vertices[b] - self.vertices[first])
                    .cross(self.vertices[c] - self.vertices[first]);
                accumulated[first] += weighted;
                accumulated[b] += weighted;
                accumulated[c] += weighted;
            }
        }

        for face in &mut self.faces {
            if !face.is_valid_for(vertex_count) {
                face.vertex_normals.clear();
                continue;
            }
            face.vertex_normals = face
                .indices
                .iter()
                .map(|&i| accumulated[i as usize].normalize_or_zero())
                .collect();
        }
    }

    /// Average of a face's vertices, `None` for an invalid face.
    #[must_use]
    pub fn face_centroid(&self, face_index: usize) -> Option<Vec3> {
        let face = self.faces.get(face_index)?;
        if !face.is_valid_for(self.vertices.len()) {
            return None;
        }
        let sum: Vec3 = face.indices.iter().map(|&i| self.vertices[i as usize]).sum();
        Some(sum / face.arity() as f32)
    }

    // ========================================================================
    // Builders
    // ========================================================================

    #[must_use]
    pub fn new_box(width: f32, height: f32, depth: f32) -> Self {
        primitives::create_box(width, height, depth)
    }

    #[must_use]
    pub fn new_plane(width: f32, height: f32) -> Self {
        primitives::create_plane(primitives::PlaneOptions {
            width,
            height,
            ..Default::default()
        })
    }

    /// One counter-clockwise triangle `a, b, c`.
    #[must_use]
    pub fn new_triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let mut geometry = Self::from_parts(vec![a, b, c], vec![Face::tri(0, 1, 2)]).with_name("Triangle");
        geometry.compute_face_normals();
        geometry.compute_bounding_volume();
        geometry
    }

    /// Line vertices with white per-vertex colors.
    #[must_use]
    pub fn new_line_strip(points: &[Vec3]) -> Self {
        let mut geometry = Self::from_parts(points.to_vec(), Vec::new()).with_name("LineStrip");
        geometry.colors = vec![Vec4::ONE; points.len()];
        geometry.compute_bounding_volume();
        geometry
    }
}
