use glam::Vec3;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub range: f32,
    pub decay: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub range: f32,
    /// Half-angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out, `[0, 1]`.
    pub penumbra: f32,
}

// Light component in the scene; position and direction come from the node.
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point(PointLight),
    Spot(SpotLight),
}

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    fn with_kind(color: Vec3, intensity: f32, kind: LightKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind,
        }
    }

    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Ambient)
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Directional)
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self::with_kind(
            color,
            intensity,
            LightKind::Point(PointLight { range, decay: 2.0 }),
        )
    }

    #[must_use]
    pub fn new_spot(color: Vec3, intensity: f32, range: f32, angle: f32, penumbra: f32) -> Self {
        Self::with_kind(
            color,
            intensity,
            LightKind::Spot(SpotLight {
                range,
                angle,
                penumbra,
            }),
        )
    }

    /// Ambient lights have no position or direction.
    #[inline]
    #[must_use]
    pub fn is_ambient(&self) -> bool {
        matches!(self.kind, LightKind::Ambient)
    }
}
