use std::borrow::Cow;

use bitflags::bitflags;
use glam::Affine3A;

use crate::resources::mesh::{Line, Mesh, Sprite};
use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::transform::Transform;

/// Discriminant of a node's payload, used as the dispatch key by the
/// transform system and the projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Empty,
    Mesh,
    Line,
    Sprite,
    Camera,
    Light,
}

impl ObjectType {
    /// The mask bit selecting this type.
    #[must_use]
    pub fn mask(self) -> ObjectMask {
        match self {
            Self::Empty => ObjectMask::EMPTY,
            Self::Mesh => ObjectMask::MESH,
            Self::Line => ObjectMask::LINE,
            Self::Sprite => ObjectMask::SPRITE,
            Self::Camera => ObjectMask::CAMERA,
            Self::Light => ObjectMask::LIGHT,
        }
    }
}

bitflags! {
    /// Set of [`ObjectType`]s, e.g. which kinds a projection pass collects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct ObjectMask: u32 {
        const EMPTY  = 1 << 0;
        const MESH   = 1 << 1;
        const LINE   = 1 << 2;
        const SPRITE = 1 << 3;
        const CAMERA = 1 << 4;
        const LIGHT  = 1 << 5;

        const RENDERABLE = Self::MESH.bits() | Self::LINE.bits() | Self::SPRITE.bits() | Self::LIGHT.bits();
    }
}

impl Default for ObjectMask {
    fn default() -> Self {
        Self::RENDERABLE
    }
}

/// Node payload. A node is exactly one of these.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    /// Pure grouping / transform node.
    #[default]
    Empty,
    Mesh(Mesh),
    Line(Line),
    Sprite(Sprite),
    Camera(Camera),
    Light(Light),
}

impl NodeKind {
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Empty => ObjectType::Empty,
            Self::Mesh(_) => ObjectType::Mesh,
            Self::Line(_) => ObjectType::Line,
            Self::Sprite(_) => ObjectType::Sprite,
            Self::Camera(_) => ObjectType::Camera,
            Self::Light(_) => ObjectType::Light,
        }
    }
}

impl From<Mesh> for NodeKind {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

impl From<Line> for NodeKind {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Sprite> for NodeKind {
    fn from(sprite: Sprite) -> Self {
        Self::Sprite(sprite)
    }
}

impl From<Camera> for NodeKind {
    fn from(camera: Camera) -> Self {
        Self::Camera(camera)
    }
}

impl From<Light> for NodeKind {
    fn from(light: Light) -> Self {
        Self::Light(light)
    }
}

/// A scene node: hierarchy links, transform, flags and a typed payload.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships:
/// - `parent`: handle of the parent node (None for root nodes), non-owning
/// - `children`: ordered child handles, owned by this node
///
/// Links are maintained by [`Scene`](crate::scene::Scene); a node is only ever
/// in one parent's child list.
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub name: Cow<'static, str>,

    // === Core Spatial Data ===
    pub transform: Transform,

    // === Core State ===
    /// Invisible nodes hide their whole subtree from projection.
    pub visible: bool,
    /// Whether frustum culling may reject this node.
    pub frustum_culled: bool,
    /// Explicit draw ordering; lower values are emitted first.
    pub render_order: i32,

    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            name: Cow::Borrowed("Node"),
            transform: Transform::new(),
            visible: true,
            frustum_culled: true,
            render_order: 0,
            kind: NodeKind::Empty,
        }
    }

    #[must_use]
    pub fn with_kind(kind: impl Into<NodeKind>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    /// Local-to-world matrix, refreshed by the transform system.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }

    #[must_use]
    pub fn camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    #[must_use]
    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
