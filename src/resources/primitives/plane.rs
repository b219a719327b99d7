use glam::{Vec2, Vec3};
use smallvec::smallvec;

use crate::resources::geometry::{Face, Geometry};

pub struct PlaneOptions {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

/// Grid in the XY plane facing +Z, made of counter-clockwise quads.
#[must_use]
pub fn create_plane(options: PlaneOptions) -> Geometry {
    let width_half = options.width / 2.0;
    let height_half = options.height / 2.0;

    let grid_x = options.width_segments.max(1);
    let grid_y = options.height_segments.max(1);

    let grid_x1 = grid_x + 1;
    let grid_y1 = grid_y + 1;

    let segment_width = options.width / grid_x as f32;
    let segment_height = options.height / grid_y as f32;

    let mut vertices = Vec::with_capacity((grid_x1 * grid_y1) as usize);
    let mut grid_uvs = Vec::with_capacity(vertices.capacity());

    for iy in 0..grid_y1 {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..grid_x1 {
            let x = ix as f32 * segment_width - width_half;
            // Rows run top to bottom
            vertices.push(Vec3::new(x, -y, 0.0));
            grid_uvs.push(Vec2::new(ix as f32 / grid_x as f32, 1.0 - (iy as f32 / grid_y as f32)));
        }
    }

    let mut faces = Vec::with_capacity((grid_x * grid_y) as usize);
    let mut uvs = Vec::with_capacity(faces.capacity());

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + grid_x1 * iy;
            let b = ix + grid_x1 * (iy + 1);
            let c = (ix + 1) + grid_x1 * (iy + 1);
            let d = (ix + 1) + grid_x1 * iy;

            let mut face = Face::quad(a, b, c, d).with_normal(Vec3::Z);
            face.vertex_normals = smallvec![Vec3::Z; 4];
            faces.push(face);
            uvs.push([a, b, c, d].iter().map(|&i| grid_uvs[i as usize]).collect());
        }
    }

    let mut geometry = Geometry::from_parts(vertices, faces).with_name("Plane");
    geometry.face_vertex_uvs.push(uvs);
    geometry.compute_bounding_volume();
    geometry
}
