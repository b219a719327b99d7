use uuid::Uuid;

use crate::assets::handle::{GeometryHandle, MaterialHandle};
use crate::assets::storage::{Asset, AssetStorage};
use crate::resources::geometry::Geometry;
use crate::resources::material::Material;

impl Asset for Geometry {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Asset for Material {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Geometry and material registry shared by every node of a scene.
///
/// Many nodes may reference the same handle (instancing). The projector only
/// reads from here.
#[derive(Debug, Default)]
pub struct AssetServer {
    pub geometries: AssetStorage<GeometryHandle, Geometry>,
    pub materials: AssetStorage<MaterialHandle, Material>,
}

impl AssetServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        self.geometries.add(geometry)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.materials.add(material)
    }

    #[inline]
    #[must_use]
    pub fn get_geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(handle)
    }

    #[inline]
    pub fn get_geometry_mut(&mut self, handle: GeometryHandle) -> Option<&mut Geometry> {
        self.geometries.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn get_material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    #[inline]
    pub fn get_material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle)
    }
}
