//! Renderable payloads attached to scene nodes.
//!
//! These are small, cheaply clonable descriptors: geometry and materials are
//! referenced by handle so many nodes can share (instance) the same assets.

use crate::assets::{GeometryHandle, MaterialHandle};

/// Material binding of a mesh: one material for every face, or a list
/// indexed by [`Face::material_index`](crate::resources::Face::material_index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialSlot {
    Single(MaterialHandle),
    PerFace(Vec<MaterialHandle>),
}

impl MaterialSlot {
    /// Material used by a face with the given material index.
    ///
    /// `None` when a per-face list has no entry for `material_index`.
    #[inline]
    #[must_use]
    pub fn resolve(&self, material_index: usize) -> Option<MaterialHandle> {
        match self {
            Self::Single(handle) => Some(*handle),
            Self::PerFace(handles) => handles.get(material_index).copied(),
        }
    }
}

impl From<MaterialHandle> for MaterialSlot {
    fn from(handle: MaterialHandle) -> Self {
        Self::Single(handle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    pub geometry: GeometryHandle,
    pub material: MaterialSlot,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: GeometryHandle, material: impl Into<MaterialSlot>) -> Self {
        Self {
            geometry,
            material: material.into(),
        }
    }
}

/// How consecutive line vertices pair up into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    /// `v0-v1, v1-v2, v2-v3, ...`
    #[default]
    Strip,
    /// `v0-v1, v2-v3, ...`
    Pieces,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub mode: LineMode,
}

impl Line {
    #[must_use]
    pub fn new(geometry: GeometryHandle, material: MaterialHandle, mode: LineMode) -> Self {
        Self {
            geometry,
            material,
            mode,
        }
    }
}

/// Camera-facing billboard placed at its node's world position.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub material: MaterialHandle,
    /// Screen-space rotation in radians.
    pub rotation: f32,
}

impl Sprite {
    #[must_use]
    pub fn new(material: MaterialHandle) -> Self {
        Self {
            material,
            rotation: 0.0,
        }
    }
}
