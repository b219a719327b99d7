//! View frustum: six inward-facing planes extracted from a view-projection
//! matrix (Gribb-Hartmann), plus point / sphere / box / object tests.
//!
//! Plane order: right, left, bottom, top, far, near. Extraction assumes an
//! OpenGL-style clip volume (`-w <= x, y, z <= w`), which is what
//! [`Camera`](crate::scene::Camera) produces.

use glam::{Affine3A, Mat4, Vec3, Vec4};

use crate::math::max_scale_on_axis;
use crate::resources::bounds::{BoundingBox, BoundingSphere};

/// A plane `dot(normal, p) + constant = 0`; the normal side is "inside".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    #[inline]
    #[must_use]
    pub const fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    #[inline]
    #[must_use]
    pub fn from_vec4(v: Vec4) -> Self {
        Self {
            normal: v.truncate(),
            constant: v.w,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_vec4(&self) -> Vec4 {
        self.normal.extend(self.constant)
    }

    /// Scales the plane so its normal has unit length.
    ///
    /// A zero normal leaves the plane as the zero plane.
    #[must_use]
    pub fn normalized(self) -> Self {
        let length = self.normal.length();
        if length == 0.0 {
            return Self::default();
        }
        let inv = 1.0 / length;
        Self {
            normal: self.normal * inv,
            constant: self.constant * inv,
        }
    }

    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    pub const RIGHT: usize = 0;
    pub const LEFT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const TOP: usize = 3;
    pub const FAR: usize = 4;
    pub const NEAR: usize = 5;

    #[must_use]
    pub fn from_planes(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    #[must_use]
    pub fn from_matrix(m: Mat4) -> Self {
        let mut frustum = Self::default();
        frustum.set_from_matrix(m);
        frustum
    }

    /// Un-normalized plane coefficients `(a, b, c, d)` for `m`, in plane order.
    #[must_use]
    pub fn extract_raw_planes(m: &Mat4) -> [Vec4; 6] {
        let rows = [m.row(0), m.row(1), m.row(2), m.row(3)];
        [
            rows[3] - rows[0], // right
            rows[3] + rows[0], // left
            rows[3] + rows[1], // bottom
            rows[3] - rows[1], // top
            rows[3] - rows[2], // far
            rows[3] + rows[2], // near
        ]
    }

    pub fn set_from_matrix(&mut self, m: Mat4) {
        for (plane, raw) in self.planes.iter_mut().zip(Self::extract_raw_planes(&m)) {
            *plane = Plane::from_vec4(raw).normalized();
        }
    }

    #[inline]
    #[must_use]
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Boundary-inclusive: a point on a plane is inside.
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Generic sphere test, boundary-inclusive: a sphere is kept while every
    /// plane distance satisfies `d >= -radius`, so a sphere exactly tangent to
    /// a plane from outside still intersects. Only spheres lying beyond a
    /// plane by more than their radius are rejected.
    ///
    /// [`intersects_object`](Self::intersects_object) uses the strict form and
    /// culls the tangent case.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    #[inline]
    #[must_use]
    pub fn intersects_bounding_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.intersects_sphere(sphere.center, sphere.radius)
    }

    /// Positive-vertex AABB test.
    #[must_use]
    pub fn intersects_box(&self, min: Vec3, max: Vec3) -> bool {
        self.planes.iter().all(|plane| {
            let n = plane.normal;
            let positive = Vec3::new(
                if n.x >= 0.0 { max.x } else { min.x },
                if n.y >= 0.0 { max.y } else { min.y },
                if n.z >= 0.0 { max.z } else { min.z },
            );
            plane.distance_to_point(positive) >= 0.0
        })
    }

    #[inline]
    #[must_use]
    pub fn intersects_aabb(&self, aabb: &BoundingBox) -> bool {
        self.intersects_box(aabb.min, aabb.max)
    }

    /// Culling test for a renderable object: `sphere` is the geometry's
    /// object-space bounding sphere, placed with `world` and scaled by the
    /// largest axis scale.
    ///
    /// Rejects on `distance <= -radius`, so an object whose sphere only
    /// touches the frustum from outside is culled, unlike with
    /// [`intersects_sphere`](Self::intersects_sphere).
    #[must_use]
    pub fn intersects_object(&self, world: &Affine3A, sphere: &BoundingSphere) -> bool {
        let center = world.transform_point3(sphere.center);
        let neg_radius = -sphere.radius * max_scale_on_axis(world);
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) > neg_radius)
    }
}
