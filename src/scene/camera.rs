use std::borrow::Cow;

use glam::{Affine3A, Mat3, Mat4, Vec3};
use uuid::Uuid;

use crate::errors::ProjectorError;
use crate::math;
use crate::scene::frustum::Frustum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

/// Camera payload.
///
/// Projection parameters are public; after changing them call
/// [`update_projection_matrix`](Self::update_projection_matrix). The view side
/// (world matrix, view matrix, frustum) is refreshed by the transform system
/// whenever the camera node's world matrix changes.
///
/// Clip space is OpenGL-style: `z_ndc` in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,

    // === Projection Only ===
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Half height of the orthographic view volume.
    pub ortho_size: f32,
    pub zoom: f32,

    // Cached matrices, read-only for the projector
    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
    pub(crate) frustum: Frustum,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self::blank(ProjectionType::Perspective, aspect, near, far);
        cam.fov = fov.to_radians();
        cam.update_projection_matrix();
        cam
    }

    /// `size` is the half height of the view volume.
    #[must_use]
    pub fn new_orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self::blank(ProjectionType::Orthographic, aspect, near, far);
        cam.ortho_size = size;
        cam.update_projection_matrix();
        cam
    }

    fn blank(projection_type: ProjectionType, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Camera"),
            projection_type,
            fov: 50.0_f32.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,
            zoom: 1.0,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            frustum: Frustum::default(),
        }
    }

    pub fn update_projection_matrix(&mut self) {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective => {
                let fov = 2.0 * ((self.fov * 0.5).tan() / zoom).atan();
                Mat4::perspective_rh_gl(fov, self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic => {
                let h = self.ortho_size / zoom;
                let w = h * self.aspect;
                Mat4::orthographic_rh_gl(-w, w, -h, h, self.near, self.far)
            }
        };

        self.refresh_view_projection();
    }

    /// Places the camera: view matrix = inverse of `world_transform`.
    ///
    /// A singular world transform leaves an identity view matrix; the
    /// projector reports such cameras as
    /// [`ProjectorError::DegenerateCamera`].
    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;

        let world = Mat4::from(*world_transform);
        self.view_matrix = match math::try_inverse(&world) {
            Some(view) => view,
            None => {
                log::warn!("Camera '{}' has a singular world matrix", self.name);
                Mat4::IDENTITY
            }
        };

        self.refresh_view_projection();
    }

    fn refresh_view_projection(&mut self) {
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
        self.frustum = Frustum::from_matrix(self.view_projection_matrix);
    }

    /// Checks projection parameters and the world transform.
    pub fn validate(&self) -> Result<(), ProjectorError> {
        let finite = self.aspect.is_finite() && self.near.is_finite() && self.far.is_finite();
        if !finite || self.aspect <= 0.0 {
            return Err(ProjectorError::InvalidCamera(format!(
                "aspect {} / near {} / far {} must be finite with a positive aspect",
                self.aspect, self.near, self.far
            )));
        }
        if self.far <= self.near {
            return Err(ProjectorError::InvalidCamera(format!(
                "far ({}) must be greater than near ({})",
                self.far, self.near
            )));
        }
        match self.projection_type {
            ProjectionType::Perspective => {
                if self.near <= 0.0 {
                    return Err(ProjectorError::InvalidCamera(format!(
                        "perspective near plane must be positive, got {}",
                        self.near
                    )));
                }
                if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
                    return Err(ProjectorError::InvalidCamera(format!(
                        "field of view must be in (0, pi) radians, got {}",
                        self.fov
                    )));
                }
            }
            ProjectionType::Orthographic => {
                if self.ortho_size <= 0.0 {
                    return Err(ProjectorError::InvalidCamera(format!(
                        "orthographic size must be positive, got {}",
                        self.ortho_size
                    )));
                }
            }
        }

        let linear = Mat3::from(self.world_matrix.matrix3);
        if !math::is_invertible_linear(&linear) {
            return Err(ProjectorError::DegenerateCamera {
                determinant: linear.determinant(),
            });
        }

        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.world_matrix.translation.into()
    }
}
