use glam::{Vec2, Vec3};
use smallvec::smallvec;

use crate::resources::geometry::{Face, Geometry};

/// Axis-aligned box centered on the origin.
///
/// 24 vertices (4 per side) so each side keeps its own flat normal and UVs;
/// every side is one counter-clockwise quad seen from outside.
#[must_use]
pub fn create_box(width: f32, height: f32, depth: f32) -> Geometry {
    let w = width / 2.0;
    let h = height / 2.0;
    let d = depth / 2.0;

    let sides: [([[f32; 3]; 4], Vec3); 6] = [
        // Front face (+Z)
        ([[-w, -h, d], [w, -h, d], [w, h, d], [-w, h, d]], Vec3::Z),
        // Back face (-Z)
        ([[-w, -h, -d], [-w, h, -d], [w, h, -d], [w, -h, -d]], Vec3::NEG_Z),
        // Top face (+Y)
        ([[-w, h, -d], [-w, h, d], [w, h, d], [w, h, -d]], Vec3::Y),
        // Bottom face (-Y)
        ([[-w, -h, -d], [w, -h, -d], [w, -h, d], [-w, -h, d]], Vec3::NEG_Y),
        // Right face (+X)
        ([[w, -h, -d], [w, h, -d], [w, h, d], [w, -h, d]], Vec3::X),
        // Left face (-X)
        ([[-w, -h, -d], [-w, -h, d], [-w, h, d], [-w, h, -d]], Vec3::NEG_X),
    ];

    let corner_uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(6);
    let mut uvs = Vec::with_capacity(6);

    for (side, (corners, normal)) in sides.into_iter().enumerate() {
        let base = vertices.len() as u32;
        vertices.extend(corners.map(Vec3::from_array));

        let mut face = Face::quad(base, base + 1, base + 2, base + 3)
            .with_normal(normal)
            .with_material_index(side);
        face.vertex_normals = smallvec![normal; 4];
        faces.push(face);
        uvs.push(corner_uvs.into_iter().collect());
    }

    let mut geometry = Geometry::from_parts(vertices, faces).with_name("Box");
    geometry.face_vertex_uvs.push(uvs);
    geometry.compute_bounding_volume();
    geometry
}
