use std::borrow::Cow;

use glam::Vec4;
use uuid::Uuid;

/// Which faces a mesh material draws, judged by projected winding
/// (counter-clockwise is front).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Source of per-element colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexColors {
    /// Material color only.
    #[default]
    None,
    /// `Face::color`
    Face,
    /// `Face::vertex_colors`, or `Geometry::colors` for lines.
    Vertex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit flat color.
    Basic,
    /// Diffuse lighting, evaluated by the backend.
    Lambert,
    Line,
    Sprite,
}

/// Material description read by the projector.
///
/// The projector only looks at `transparent`, `side`, `vertex_colors`,
/// `size_attenuation` and `visible`; everything else is carried through for
/// the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,
    pub kind: MaterialKind,

    pub color: Vec4,
    pub opacity: f32,
    /// Transparent materials are never back-face culled.
    pub transparent: bool,
    pub side: Side,
    pub vertex_colors: VertexColors,
    pub wireframe: bool,
    pub line_width: f32,
    /// Sprites shrink with distance when set; otherwise keep a constant
    /// screen size.
    pub size_attenuation: bool,
    pub visible: bool,
}

impl Material {
    fn with_kind(kind: MaterialKind, color: Vec4) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Material"),
            kind,
            color,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            vertex_colors: VertexColors::None,
            wireframe: false,
            line_width: 1.0,
            size_attenuation: true,
            visible: true,
        }
    }

    #[must_use]
    pub fn new_basic(color: Vec4) -> Self {
        Self::with_kind(MaterialKind::Basic, color)
    }

    #[must_use]
    pub fn new_lambert(color: Vec4) -> Self {
        Self::with_kind(MaterialKind::Lambert, color)
    }

    #[must_use]
    pub fn new_line(color: Vec4) -> Self {
        Self::with_kind(MaterialKind::Line, color)
    }

    #[must_use]
    pub fn new_sprite(color: Vec4) -> Self {
        Self::with_kind(MaterialKind::Sprite, color)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Sets opacity; anything below 1 also marks the material transparent.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = opacity < 1.0;
        self
    }

    #[must_use]
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    #[must_use]
    pub fn with_vertex_colors(mut self, vertex_colors: VertexColors) -> Self {
        self.vertex_colors = vertex_colors;
        self
    }

    #[must_use]
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_size_attenuation(mut self, size_attenuation: bool) -> Self {
        self.size_attenuation = size_attenuation;
        self
    }

    /// Whether faces with the given winding are drawn.
    #[must_use]
    pub fn keeps_face(&self, front_facing: bool) -> bool {
        if self.transparent {
            return true;
        }
        match self.side {
            Side::Front => front_facing,
            Side::Back => !front_facing,
            Side::Double => true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new_basic(Vec4::ONE)
    }
}
