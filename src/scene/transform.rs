use glam::{Affine3A, EulerRot, Mat3, Mat4, Quat, Vec3};

/// Transform component
///
/// Holds a node's position, rotation and scale (TRS) together with the cached
/// local and world matrices and the dirty-check state that decides when they
/// need to be rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    /// When `false` the local matrix is frozen: TRS edits are ignored until
    /// [`update_matrix`](Self::update_matrix) is called explicitly. The node
    /// still receives a new world matrix when an ancestor changes.
    pub matrix_auto_update: bool,

    // Matrix caches, written by the transform system.
    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,
    pub(crate) world_changed: bool,

    // Shadow state for dirty checking
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
    world_needs_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix_auto_update: true,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            world_changed: false,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
            world_needs_update: false,
        }
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    // ========================================================================
    // Dirty-checked local matrix update
    // ========================================================================

    /// Rebuilds the local matrix if TRS changed since the last rebuild (only
    /// when `matrix_auto_update` is set).
    ///
    /// Returns `true` if the local matrix changed since the previous call,
    /// which includes rebuilds done through [`update_matrix`](Self::update_matrix)
    /// and [`apply_local_matrix`](Self::apply_local_matrix).
    pub fn update_local_matrix(&mut self) -> bool {
        if self.matrix_auto_update {
            let changed = self.position != self.last_position
                || self.rotation != self.last_rotation
                || self.scale != self.last_scale
                || self.force_update;

            if changed {
                self.rebuild_local_matrix();
            }
        }

        std::mem::take(&mut self.world_needs_update)
    }

    /// Unconditionally rebuilds the local matrix from TRS, regardless of
    /// `matrix_auto_update`.
    pub fn update_matrix(&mut self) {
        self.rebuild_local_matrix();
    }

    fn rebuild_local_matrix(&mut self) {
        self.local_matrix =
            Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

        self.last_position = self.position;
        self.last_rotation = self.rotation;
        self.last_scale = self.scale;
        self.force_update = false;
        self.world_needs_update = true;
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Current rotation as XYZ Euler angles.
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    /// World-space translation of this node.
    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.translation.into()
    }

    /// Whether the world matrix was recomputed by the last hierarchy update.
    #[inline]
    #[must_use]
    pub fn world_changed(&self) -> bool {
        self.world_changed
    }

    pub(crate) fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
        self.world_changed = true;
    }

    /// Sets the local matrix directly and decomposes it back into TRS.
    ///
    /// Shear is lost in the decomposition but kept in the local matrix itself.
    pub fn apply_local_matrix(&mut self, mat: Affine3A) {
        self.local_matrix = mat;

        let (scale, rotation, translation) = mat.to_scale_rotation_translation();
        self.scale = scale;
        self.rotation = rotation;
        self.position = translation;

        self.last_scale = scale;
        self.last_rotation = rotation;
        self.last_position = translation;
        self.force_update = false;
        self.world_needs_update = true;
    }

    /// Orients the transform so that local -Z points at `target`.
    ///
    /// `target` and `up` are in the parent's coordinate space. Degenerate
    /// input (target on the up axis or at the position) leaves the rotation
    /// untouched.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO || forward.cross(up).length_squared() < 1e-4 {
            return;
        }

        let right = forward.cross(up).normalize();
        let new_up = right.cross(forward).normalize();

        let rot_mat = Mat3::from_cols(right, new_up, -forward);
        self.rotation = Quat::from_mat3(&rot_mat);
    }

    /// Forces the next [`update_local_matrix`](Self::update_local_matrix) to rebuild.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }

    /// Requests a world matrix refresh without touching the local matrix
    /// (re-parenting keeps frozen local matrices frozen).
    pub(crate) fn mark_world_dirty(&mut self) {
        self.world_needs_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
